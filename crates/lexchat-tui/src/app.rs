use anyhow::Result;
use lexchat_core::{
    ApiKeyStore, ChatSession, Config, GeminiClient, SubmitError, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Conversation state
    pub session: ChatSession,
    pub keys: ApiKeyStore,
    pub client: GeminiClient,
    pub model: String,

    // Input line state
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Chat viewport state
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat pane, set during render
    pub chat_width: u16,  // inner width of the chat pane, for wrap calculations

    // In-flight request
    pub query_task: Option<tokio::task::JoinHandle<anyhow::Result<String>>>,

    // Animation state (0-2 for the ellipsis)
    pub animation_frame: u8,

    // API key popup state
    pub show_api_key_input: bool,
    pub api_key_input: String,
    pub api_key_cursor: usize,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load().unwrap_or_else(|_| Config::new());
        let config_path = Config::config_path()?;

        // Env var wins over the saved config
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let client = GeminiClient::new(&api_key);

        Ok(Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            session: ChatSession::new(),
            keys: ApiKeyStore::new(api_key, config_path),
            client,
            model,
            input: String::new(),
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            query_task: None,
            animation_frame: 0,
            show_api_key_input: false,
            api_key_input: String::new(),
            api_key_cursor: 0,
        })
    }

    /// Submit the input line as a new exchange.
    ///
    /// Empty input and input while a request is in flight are ignored; a
    /// missing key opens the API key popup instead of sending anything.
    pub fn submit_input(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.query_task.is_some() {
            return;
        }

        match self.session.begin(&self.keys, &text) {
            Ok(prompt) => {
                self.input.clear();
                self.cursor = 0;

                let client = self.client.clone();
                let model = self.model.clone();
                self.query_task = Some(tokio::spawn(async move {
                    client.generate(&model, &prompt, DEFAULT_TEMPERATURE).await
                }));

                self.scroll_to_bottom();
            }
            Err(SubmitError::MissingApiKey) => {
                self.open_api_key_input();
            }
            // query_task already gates re-entry above
            Err(SubmitError::Busy) => {}
        }
    }

    /// Fold a finished request back into the transcript.
    pub fn finish_exchange(&mut self, outcome: anyhow::Result<String>) {
        self.session.complete(outcome);
        self.scroll_to_bottom();
    }

    pub fn open_api_key_input(&mut self) {
        self.show_api_key_input = true;
        self.api_key_input.clear();
        self.api_key_cursor = 0;
    }

    /// Store the key from the popup and swap in a client that uses it.
    pub fn apply_api_key(&mut self) {
        if !self.api_key_input.is_empty() {
            self.keys.set(self.api_key_input.clone());
            self.client = GeminiClient::new(self.keys.get());
        }
        self.show_api_key_input = false;
        self.api_key_input.clear();
        self.api_key_cursor = 0;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1).min(self.max_scroll());
    }

    /// Scroll so the newest entry (or the "Thinking..." line) is visible.
    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self.max_scroll();
    }

    /// Total wrapped line count of the transcript, using the chat pane
    /// width measured during the last render.
    fn transcript_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total: u16 = 0;
        for msg in self.session.messages() {
            total += 1; // role line ("You:" or "AI:")
            for line in msg.content.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let chars = line.chars().count();
                if chars == 0 {
                    total += 1;
                } else {
                    total += ((chars / wrap_width) + 1) as u16;
                }
            }
            total += 1; // blank line after message
        }

        if self.session.is_busy() {
            total += 2; // "AI:" + "Thinking..."
        }
        total
    }

    fn max_scroll(&self) -> u16 {
        let visible = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.transcript_lines().saturating_sub(visible)
    }
}
