//! Terminal output: color detection, confirmation prompt and banners.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use zfssa_core::report::RULE_WIDTH;
use zfssa_core::{Preview, Prompt};

use crate::cli::ColorMode;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// The rows about to be changed, as a table.
pub fn render_preview(preview: &Preview) -> String {
    let mut builder = Builder::default();
    builder.push_record(preview.header.iter().copied());
    for row in &preview.rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    builder.build().with(Style::psql()).to_string()
}

/// Shown when the appliance certificate is not checked.
pub fn tls_warning(color: bool) -> String {
    let rule = "*".repeat(RULE_WIDTH);
    let text = "Warning: not using certificate verification.";
    if color {
        format!("{rule}\n{}\n{rule}", text.yellow())
    } else {
        format!("{rule}\n{text}\n{rule}")
    }
}

/// Interactive yes/no on the terminal; the default answer is no.
pub struct TerminalPrompt {
    pub color: bool,
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, preview: &Preview) -> io::Result<bool> {
        let intro = if self.color {
            preview.intro.red().to_string()
        } else {
            preview.intro.to_owned()
        };
        println!("{intro}\n{}", render_preview(preview));
        Confirm::new()
            .with_prompt(preview.question)
            .default(false)
            .interact()
            .map_err(io::Error::other)
    }
}
