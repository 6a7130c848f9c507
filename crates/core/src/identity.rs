#![forbid(unsafe_code)]

/// Parsed form of a free-text identity string such as
/// `"Jane Doe <jane@example.com>"`, a bare email, or a bare name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedIdentity {
    pub name: String,
    pub email: Option<String>,
}

/// Parse a free-text identity string. Blank input yields `None` so callers
/// never create placeholder users for empty fields.
///
/// Rules: the last `<...>` group wins as the email; a string containing `@`
/// without angle brackets is a bare email whose display name is derived from
/// the local part; anything else is a name with no email.
pub fn parse(raw: &str) -> Option<ParsedIdentity> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(open) = raw.rfind('<')
        && let Some(close) = raw[open..].find('>')
    {
        let email = raw[open + 1..open + close].trim();
        if !email.is_empty() {
            let name = raw[..open].trim();
            let name = if name.is_empty() {
                display_name_from_email(email)
            } else {
                name.to_string()
            };
            return Some(ParsedIdentity {
                name,
                email: Some(email.to_string()),
            });
        }
    }

    if raw.contains('@') {
        return Some(ParsedIdentity {
            name: display_name_from_email(raw),
            email: Some(raw.to_string()),
        });
    }

    Some(ParsedIdentity {
        name: raw.to_string(),
        email: None,
    })
}

/// Case-normalized email used as the deduplication key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    local
        .chars()
        .map(|ch| if ch == '.' || ch == '_' { ' ' } else { ch })
        .collect()
}
