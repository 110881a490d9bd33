//! The average-stake recipe for the trading zone modal.
//!
//! Drops the "(USD)" suffix from the available-cash label and adds a
//! "Stake Promedio" card after the balance card.

use crate::recipe::schema::{Insertion, Metadata, Recipe, Rename};

/// File patched when no target is given.
pub const DEFAULT_TARGET: &str = r"c:\Users\nicou\Downloads\wisebetultimogit\WiseBetCore-Front-ERP--main\components\TradingZoneModal.tsx";

pub const CASH_LABEL: &str = "Caja Disponible (USD)";
pub const CASH_LABEL_RENAMED: &str = "Caja Disponible";

pub const BALANCE_ANCHOR: &str = "${p.balance.toLocaleString()}</span>";
pub const BALANCE_CLOSE_MARKER: &str = "</div>";
pub const BALANCE_INDENT_MARKER: &str = "<span";

const AVERAGE_STAKE_BLOCK: &[&str] = &[
    r#"<div className="flex justify-between items-center p-3 py-4 bg-[#00ff88]/5 rounded-2xl border border-[#00ff88]/10 group/stake relative overflow-hidden">"#,
    r#"    <div className="absolute top-0 right-0 w-16 h-16 bg-[#00ff88]/10 blur-2xl rounded-full" />"#,
    r#"    <div className="relative z-10 flex items-center gap-3">"#,
    r#"       <Target size={14} className="text-[#00ff88]" />"#,
    r#"       <span className="text-[9px] font-black text-[#00ff88] uppercase tracking-widest">Stake Promedio</span>"#,
    r#"    </div>"#,
    r#"    <span className="relative z-10 text-lg font-black text-[#00ff88] italic drop-shadow-[0_0_10px_rgba(0,255,136,0.3)]">${p.averageStake}</span>"#,
    r#"</div>"#,
];

pub fn builtin_recipe() -> Recipe {
    Recipe {
        meta: Metadata {
            name: "average-stake".to_string(),
            description: Some(
                "Drop the USD suffix from the cash label and add an average stake card".to_string(),
            ),
            target: Some(DEFAULT_TARGET.to_string()),
        },
        renames: vec![Rename {
            search: CASH_LABEL.to_string(),
            replace: CASH_LABEL_RENAMED.to_string(),
        }],
        insertions: vec![Insertion {
            anchor: BALANCE_ANCHOR.to_string(),
            close_marker: BALANCE_CLOSE_MARKER.to_string(),
            indent_marker: BALANCE_INDENT_MARKER.to_string(),
            leading_blank_line: true,
            lines: AVERAGE_STAKE_BLOCK.iter().map(|line| line.to_string()).collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_recipe_is_valid() {
        builtin_recipe().validate().unwrap();
    }

    #[test]
    fn block_is_balanced() {
        let opens = AVERAGE_STAKE_BLOCK
            .iter()
            .filter(|line| line.contains("<div") && !line.ends_with("/>"))
            .count();
        let closes = AVERAGE_STAKE_BLOCK
            .iter()
            .filter(|line| line.contains("</div>"))
            .count();
        assert_eq!(opens, closes);
    }
}
