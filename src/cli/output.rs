//! Colored output helpers for the CLI
//!
//! Provides consistent, colored terminal output for the memstack CLI.

use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the memstack banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n",
                "memstack".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n   memstack v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print a section header
    pub fn header(&self, message: &str) {
        if self.colored {
            println!("{}", message.bright_white().bold());
        } else {
            println!("{}", message);
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a hint for the user
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "→".cyan(), message.dimmed());
        } else {
            println!("  [HINT] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print one row of the status table
    pub fn status_row(&self, name: &str, endpoint: &str, up: bool) {
        if self.colored {
            let state = if up {
                "up".green().bold().to_string()
            } else {
                "down".red().bold().to_string()
            };
            println!("  {:<16} {:<32} {}", name.bright_white(), endpoint.dimmed(), state);
        } else {
            println!("  {:<16} {:<32} {}", name, endpoint, if up { "up" } else { "down" });
        }
    }
}
