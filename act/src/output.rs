use std::sync::atomic::{AtomicBool, Ordering};

use anstyle::{AnsiColor, Color, Style};

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

/// Toggle ANSI styling of terminal messages (`--no-color`)
pub fn set_color(enabled: bool) {
  COLOR_ENABLED.store(enabled, Ordering::Relaxed);
}

fn paint(style: Style, text: &str) -> String {
  if !COLOR_ENABLED.load(Ordering::Relaxed) {
    return text.to_string();
  }

  format!("{}{text}{}", style.render(), style.render_reset())
}

fn colored(color: AnsiColor) -> Style {
  Style::new().fg_color(Some(Color::Ansi(color)))
}

pub fn red(text: &str) -> String {
  paint(colored(AnsiColor::Red), text)
}

pub fn green(text: &str) -> String {
  paint(colored(AnsiColor::Green), text)
}

pub fn blue(text: &str) -> String {
  paint(colored(AnsiColor::Blue), text)
}

pub fn bold(text: &str) -> String {
  paint(Style::new().bold(), text)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_wraps_text_in_ansi_codes() {
    let painted = paint(colored(AnsiColor::Red), "error");
    assert!(painted.starts_with("\u{1b}["));
    assert!(painted.contains("error"));
    assert!(painted.ends_with("\u{1b}[0m"));
  }
}
