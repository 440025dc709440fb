//! Terminal output for the card resource CLI

use colored::Colorize;

/// Line reporting a completed step
pub fn success(message: &str) -> String {
    format!("{} {}", "✔".green().bold(), message.green())
}

/// Line reporting a failed exchange with a reader
pub fn failure(message: &str) -> String {
    format!("{} {}", "✘".red().bold(), message.red())
}

/// Titled block of `key: value` lines, keys padded to a common width
pub fn key_value_box(title: &str, items: &[(&str, String)]) -> String {
    let width = items.iter().map(|(key, _)| key.len() + 1).max().unwrap_or(0);

    items.iter().fold(
        title.bold().underline().to_string(),
        |mut block, (key, value)| {
            let label = format!("{:<width$}", format!("{key}:"));
            block.push_str(&format!("\n  {}  {value}", label.bold()));
            block
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_box_aligns_keys() {
        colored::control::set_override(false);

        let block = key_value_box(
            "Allocated reader",
            &[
                ("Name", "CARD_RESOURCE_contactReader".to_string()),
                ("Contactless", "false".to_string()),
            ],
        );
        assert_eq!(
            block,
            "Allocated reader\n  Name:         CARD_RESOURCE_contactReader\n  Contactless:  false"
        );
    }
}
