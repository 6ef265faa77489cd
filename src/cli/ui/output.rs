use console::style;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    /// Aligned `label: value` line; absent values are dimmed
    pub fn field(&self, label: &str, value: Option<&str>) {
        match value {
            Some(v) if !v.is_empty() => println!("  {:<14} {}", style(label).cyan(), v),
            _ => println!("  {:<14} {}", style(label).cyan(), style("-").dim()),
        }
    }

    /// Print a value as pretty JSON
    pub fn json<T: serde::Serialize>(&self, value: &T) -> crate::types::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
