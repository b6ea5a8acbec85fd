//! Display (monitor) descriptions and index resolution.

use serde::Serialize;

use crate::errors::ZblError;

/// Owned description of one display output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayInfo {
    /// Zero-based index as accepted by `--display-id`.
    pub index: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Map a user-supplied display id onto an index into a list of `count`
/// displays.
pub fn resolve_display_index(display_id: i64, count: usize) -> Result<usize, ZblError> {
    usize::try_from(display_id)
        .ok()
        .filter(|&i| i < count)
        .ok_or_else(|| {
            ZblError::BackendFailure(format!(
                "display {display_id} not found; system has {count} display(s)"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_in_range() {
        assert_eq!(resolve_display_index(0, 1).unwrap(), 0);
        assert_eq!(resolve_display_index(2, 3).unwrap(), 2);
    }

    #[test]
    fn test_resolve_out_of_range() {
        let err = resolve_display_index(3, 3).unwrap_err();
        assert_eq!(
            err,
            ZblError::BackendFailure("display 3 not found; system has 3 display(s)".into())
        );
        assert!(resolve_display_index(0, 0).is_err());
    }

    #[test]
    fn test_resolve_negative() {
        assert!(resolve_display_index(-1, 4).is_err());
        assert!(resolve_display_index(i64::MIN, 4).is_err());
    }

    #[test]
    fn test_display_info_serialization() {
        let d = DisplayInfo {
            index: 1,
            name: "\\\\.\\DISPLAY2".into(),
            width: 2560,
            height: 1440,
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"index\":1"));
        assert!(json.contains("2560"));
    }
}
