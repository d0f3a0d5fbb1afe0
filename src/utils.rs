use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

fn app_name(profile: Profile) -> &'static str {
    match profile {
        Profile::Dev => "bdg-dev",
        Profile::Prod => "bdg",
    }
}

/// Get the configuration directory path for bdg.
/// If profile is Dev, uses "bdg-dev" instead of "bdg".
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    // Use "com" as qualifier for better cross-platform compatibility
    ProjectDirs::from("com", "bdg", app_name(profile)).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for bdg.
/// If profile is Dev, uses "bdg-dev" instead of "bdg".
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "bdg", app_name(profile)).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Current wall-clock time as Unix nanoseconds, the timestamp unit used
/// on all entities.
pub fn now_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0)
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque contact identifier: `contact-<unix millis>-<suffix>`.
/// The counter keeps ids unique within the same millisecond.
pub fn generate_contact_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("contact-{}-{:04x}", millis, suffix & 0xffff)
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux, Option/Alt on macOS)
/// This follows the standard cross-platform TUI pattern where Ctrl and Option/Alt are treated as equivalent
pub fn has_primary_modifier(modifiers: crossterm::event::KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            || modifiers.contains(crossterm::event::KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier
/// On macOS, "Ctrl+" is replaced with "Opt+" for better UX (Option key)
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports: single keys ("q", "n", "j", "k"), special keys ("Enter", "Left", "Right"),
/// and modifiers ("Ctrl+s")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        "Insert" => Ok(KeyCode::Insert),
        "F1" => Ok(KeyCode::F(1)),
        "F2" => Ok(KeyCode::F(2)),
        "F3" => Ok(KeyCode::F(3)),
        "F4" => Ok(KeyCode::F(4)),
        "F5" => Ok(KeyCode::F(5)),
        "F6" => Ok(KeyCode::F(6)),
        "F7" => Ok(KeyCode::F(7)),
        "F8" => Ok(KeyCode::F(8)),
        "F9" => Ok(KeyCode::F(9)),
        "F10" => Ok(KeyCode::F(10)),
        "F11" => Ok(KeyCode::F(11)),
        "F12" => Ok(KeyCode::F(12)),
        _ => {
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn test_parse_key_binding_single_char() {
        let binding = parse_key_binding("q").unwrap();
        assert_eq!(binding.key_code, KeyCode::Char('q'));
        assert!(!binding.requires_ctrl);
    }

    #[test]
    fn test_parse_key_binding_special() {
        let binding = parse_key_binding("Enter").unwrap();
        assert_eq!(binding.key_code, KeyCode::Enter);
        let binding = parse_key_binding("F1").unwrap();
        assert_eq!(binding.key_code, KeyCode::F(1));
    }

    #[test]
    fn test_parse_key_binding_ctrl() {
        let binding = parse_key_binding("Ctrl+s").unwrap();
        assert_eq!(binding.key_code, KeyCode::Char('s'));
        assert!(binding.requires_ctrl);
    }

    #[test]
    fn test_parse_key_binding_unknown() {
        assert!(parse_key_binding("NotAKey").is_err());
    }

    #[test]
    fn test_generate_contact_id_format() {
        let id = generate_contact_id();
        assert!(id.starts_with("contact-"));
        assert_eq!(id.split('-').count(), 3);
    }
}
