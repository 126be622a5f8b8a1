//! Zone table command.

use fitout_core::StateCode;
use fitout_storefront::shipping::fallback::Zone;

/// Zone of every destination state from `origin`, in postal order.
#[must_use]
pub fn table(origin: StateCode) -> Vec<(StateCode, Zone)> {
    StateCode::ALL
        .iter()
        .map(|&dest| (dest, Zone::between(origin, dest)))
        .collect()
}

/// Print the zone table.
pub fn print(origin: StateCode) {
    #[allow(clippy::print_stdout)]
    {
        println!("From {origin}:");
        for (dest, zone) in table(origin) {
            println!("  {:<4}{zone}", dest.code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_victoria() {
        let table = table(StateCode::Vic);
        assert_eq!(table.len(), StateCode::ALL.len());
        assert!(table.contains(&(StateCode::Vic, Zone::SameState)));
        assert!(table.contains(&(StateCode::Nsw, Zone::Interstate)));
        assert!(table.contains(&(StateCode::Wa, Zone::Remote)));
        assert!(table.contains(&(StateCode::Nt, Zone::Remote)));
    }

    #[test]
    fn test_table_from_perth() {
        let table = table(StateCode::Wa);
        assert!(table.contains(&(StateCode::Wa, Zone::SameState)));
        assert!(table.contains(&(StateCode::Nt, Zone::Remote)));
    }
}
