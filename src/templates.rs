//! Message template rendering — `{client}`, `{date}`, `{time}` placeholders.

use chrono::{DateTime, Utc};

/// Fills a template body with the client's name and the appointment instant.
/// Unknown placeholders are left as-is so a typo shows up in the preview
/// instead of vanishing silently.
pub fn render(body: &str, client_name: &str, scheduled_at: &DateTime<Utc>) -> String {
    body.replace("{client}", client_name)
        .replace("{date}", &scheduled_at.format("%d/%m/%Y").to_string())
        .replace("{time}", &scheduled_at.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn fills_all_placeholders() {
        let rendered = render(
            "Hola {client}, te esperamos el {date} a las {time}.",
            "Ana",
            &utc("2025-03-01T10:30:00Z"),
        );
        assert_eq!(rendered, "Hola Ana, te esperamos el 01/03/2025 a las 10:30.");
    }

    #[test]
    fn repeated_placeholders_all_replaced() {
        let rendered = render("{client} {client}", "Ana", &utc("2025-03-01T10:00:00Z"));
        assert_eq!(rendered, "Ana Ana");
    }

    #[test]
    fn unknown_placeholders_survive() {
        let rendered = render("Hola {cliente}", "Ana", &utc("2025-03-01T10:00:00Z"));
        assert_eq!(rendered, "Hola {cliente}");
    }
}
