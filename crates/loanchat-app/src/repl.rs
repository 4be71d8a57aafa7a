//! Interactive loop: plain lines are chat turns, `/` lines are commands.

use std::io::Stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use loanchat_common::LoanchatError;
use loanchat_core::{ConversationClient, ConversationSession, Customer, Renderer};

use crate::host::SystemHost;
use crate::terminal::TerminalRenderer;

const HELP: &str = "\
Type a message and press Enter to chat. Commands:
  /upload <path>  attach a document (PDF, JPEG or PNG)
  /download       get the sanction letter once it is ready
  /customers      list demo customers
  /use <n>        send demo customer n's phone number
  /letters        list letters generated by the engine
  /health         check the engine
  /reset          start a new conversation
  /help           show this help
  /quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message(String),
    Upload(PathBuf),
    Download,
    Customers,
    UseCustomer(usize),
    Letters,
    Health,
    Reset,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Message(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "upload" if arg.is_empty() => Command::Invalid("Usage: /upload <path>".into()),
            "upload" => Command::Upload(PathBuf::from(arg)),
            "download" => Command::Download,
            "customers" => Command::Customers,
            "use" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => Command::UseCustomer(n),
                _ => Command::Invalid("Usage: /use <n>, where n is a number from /customers".into()),
            },
            "letters" => Command::Letters,
            "health" => Command::Health,
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("Unknown command /{other}. Type /help for the list.")),
        }
    }
}

pub struct Repl {
    session: ConversationSession,
    client: Arc<ConversationClient>,
    renderer: Arc<TerminalRenderer<Stdout>>,
    host: SystemHost,
    customers: Vec<Customer>,
}

impl Repl {
    pub fn new(
        session: ConversationSession,
        client: Arc<ConversationClient>,
        renderer: Arc<TerminalRenderer<Stdout>>,
        host: SystemHost,
    ) -> Self {
        Self {
            session,
            client,
            renderer,
            host,
            customers: Vec::new(),
        }
    }

    pub async fn run(mut self) -> Result<(), LoanchatError> {
        self.renderer.line("Type /help for commands.");
        self.session.start().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Command::Quit => break,
                command => self.execute(command).await,
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Message(text) => {
                let outcome = self.session.send_message(&text).await;
                debug!(?outcome, "message turn finished");
            }
            Command::Upload(path) => self.upload(&path).await,
            Command::Download => {
                // Failures are already rendered by the session.
                if let Err(e) = self.session.confirm_download(&self.host).await {
                    debug!("download not possible: {e}");
                }
            }
            Command::Customers => self.list_customers().await,
            Command::UseCustomer(n) => self.use_customer(n).await,
            Command::Letters => self.list_letters().await,
            Command::Health => self.check_health().await,
            Command::Reset => {
                self.session.reset().await;
            }
            Command::Help => self.renderer.line(HELP),
            Command::Invalid(message) => self.renderer.notice(&message),
            Command::Quit => {}
        }
    }

    async fn upload(&self, path: &Path) {
        let outcome = self.session.send_path(path).await;
        debug!(?outcome, path = %path.display(), "upload turn finished");
    }

    async fn fetch_customers(&mut self) -> bool {
        match self.client.customers().await {
            Ok(customers) => {
                self.customers = customers;
                true
            }
            Err(e) => {
                warn!("failed to fetch customers: {e}");
                self.renderer.notice("Failed to load test customers.");
                false
            }
        }
    }

    async fn list_customers(&mut self) {
        if !self.fetch_customers().await {
            return;
        }
        if self.customers.is_empty() {
            self.renderer.notice("No test customers available.");
            return;
        }
        for (i, c) in self.customers.iter().enumerate() {
            self.renderer.line(&format!(
                "  {}. {} ({}), pre-approved \u{20b9}{}, phone {}",
                i + 1,
                c.name,
                c.city,
                format_inr(c.pre_approved_limit),
                c.phone
            ));
        }
    }

    async fn use_customer(&mut self, n: usize) {
        if self.customers.is_empty() && !self.fetch_customers().await {
            return;
        }
        let Some(phone) = self.customers.get(n - 1).map(|c| c.phone.clone()) else {
            self.renderer
                .notice(&format!("No customer #{n}. Run /customers to see the list."));
            return;
        };
        self.session.send_message(&phone).await;
    }

    async fn list_letters(&self) {
        match self.client.letter_status().await {
            Ok(status) if !status.exists => {
                self.renderer.notice("The engine has no letter directory yet.");
            }
            Ok(status) => {
                let dir = status.directory.as_deref().unwrap_or("?");
                self.renderer
                    .notice(&format!("{} letter(s) in {dir}", status.count));
                for file in &status.files {
                    self.renderer
                        .line(&format!("    {} ({} bytes)", file.name, file.size));
                }
            }
            Err(e) => {
                warn!("letter status failed: {e}");
                self.renderer.notice(&format!("Could not list letters: {e}"));
            }
        }
    }

    async fn check_health(&self) {
        match self.client.health().await {
            Ok(health) => self
                .renderer
                .notice(&format!("Engine is {}: {}", health.status, health.message)),
            Err(e) => self.renderer.notice(&format!("Engine unreachable: {e}")),
        }
    }
}

/// Group digits the Indian way: 1500000 -> 15,00,000.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
