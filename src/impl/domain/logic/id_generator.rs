pub const DECL_BASE: u64 = 0xB9ED76;
pub const NDP_BASE: u64 = 0x1579A471;

const DECL_PREFIX: &str = "DECL-2026-";
const NDP_PREFIX: &str = "NDP-2026-";

pub fn generate_declaration_id(sequence: u64) -> String {
    format!("{}{:X}", DECL_PREFIX, DECL_BASE + sequence)
}

pub fn generate_note_id(sequence: u64) -> String {
    format!("{}{:X}", NDP_PREFIX, NDP_BASE + sequence)
}

/// Recovers the sequence number behind a `DECL-2026-` id. `None` for ids of
/// another shape or below the base.
pub fn declaration_sequence(id: &str) -> Option<u64> {
    let hex = id.strip_prefix(DECL_PREFIX)?;
    let value = u64::from_str_radix(hex, 16).ok()?;
    value.checked_sub(DECL_BASE)
}

/// Sequence behind a declaration id, clamped to 0 for ids that do not carry
/// one (manual or legacy records).
pub(crate) fn sequence_or_zero(id: &str) -> u64 {
    declaration_sequence(id).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_ids_are_uppercase_hex_from_base() {
        assert_eq!(generate_declaration_id(0), "DECL-2026-B9ED76");
        assert_eq!(generate_declaration_id(10), "DECL-2026-B9ED80");
    }

    #[test]
    fn note_ids_are_uppercase_hex_from_base() {
        assert_eq!(generate_note_id(0), "NDP-2026-1579A471");
        assert_eq!(generate_note_id(15), "NDP-2026-1579A480");
    }

    #[test]
    fn sequence_is_recovered_from_id() {
        assert_eq!(declaration_sequence(&generate_declaration_id(9123)), Some(9123));
        assert_eq!(declaration_sequence("DECL-2026-b9ed77"), Some(1));
    }

    #[test]
    fn malformed_ids_have_no_sequence() {
        assert_eq!(declaration_sequence("DECL-2026-ZZZ"), None);
        assert_eq!(declaration_sequence("DECL-2026-10"), None);
        assert_eq!(declaration_sequence("NDP-2026-1579A471"), None);
        assert_eq!(sequence_or_zero("MANUAL-7"), 0);
    }
}
