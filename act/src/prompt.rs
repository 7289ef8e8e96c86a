//! Interactive terminal prompts
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// Let the user pick one of `items`; `None` when the prompt is dismissed
pub fn select(prompt: &str, items: &[String]) -> Result<Option<usize>> {
  let choice = Select::with_theme(&ColorfulTheme::default())
    .with_prompt(prompt)
    .items(items)
    .default(0)
    .interact_opt()?;

  Ok(choice)
}

pub fn input(prompt: &str) -> Result<String> {
  let value: String = Input::with_theme(&ColorfulTheme::default())
    .with_prompt(prompt)
    .interact_text()?;

  Ok(value.trim().to_string())
}

pub fn confirm(prompt: &str) -> Result<bool> {
  let confirmed = Confirm::with_theme(&ColorfulTheme::default())
    .with_prompt(prompt)
    .default(false)
    .interact()?;

  Ok(confirmed)
}

/// Ask for the current code of the user's MFA device
pub fn mfa_token() -> Result<String> {
  let code: String = Input::with_theme(&ColorfulTheme::default())
    .with_prompt("MFA token code")
    .validate_with(|code: &String| -> Result<(), &str> {
      if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
      } else {
        Err("token code must be 6 digits")
      }
    })
    .interact_text()?;

  Ok(code)
}
