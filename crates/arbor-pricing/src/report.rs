//! Text pricing reports.
//!
//! Trees are printed transposed so they read left to right, one row per
//! terminal node:
//!
//! ```text
//! 0.578 -> 0.845 -> 1.000
//!                   0.000
//!          0.412 -> 0.702
//!                   0.000
//! ```
//!
//! Node `k` of level `i` sits on row `k * (leaves / 2^i)`.

use std::fmt;

use arbor_core::ArborResult;
use arbor_lattice::NodeTree;

use crate::contract::OptionContract;
use crate::engine::Valuation;

const LABEL_WIDTH: usize = 20;
const SECTION_INDENT: &str = "    ";

/// Renders nested levels as a transposed tree with `precision` decimals.
///
/// Returns an empty string for an empty tree.
pub fn render_tree(levels: &[Vec<f64>], precision: usize) -> String {
    let Some(leaves) = levels.last().map(Vec::len) else {
        return String::new();
    };
    if leaves == 0 {
        return String::new();
    }

    let mut grid: Vec<Vec<Option<String>>> = vec![vec![None; levels.len()]; leaves];
    let mut widths = vec![0usize; levels.len()];

    for (i, level) in levels.iter().enumerate() {
        let stride = leaves / level.len().max(1);
        for (k, value) in level.iter().enumerate() {
            let cell = format!("{value:.precision$}");
            widths[i] = widths[i].max(cell.len());
            if let Some(row) = grid.get_mut(k * stride) {
                row[i] = Some(cell);
            }
        }
    }

    let mut out = String::new();
    for row in &grid {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            match cell {
                Some(text) => {
                    if !line.trim().is_empty() {
                        line.push_str(" -> ");
                    }
                    line.push_str(&format!("{text:>width$}", width = widths[i]));
                }
                None => line.push_str(&" ".repeat(widths[i] + 4)),
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Indents every line after the first by `indent` spaces.
///
/// Lets a multi-line block start after a `label : ` prefix and stay aligned.
pub fn indent_linebreaks(text: &str, indent: usize) -> String {
    text.replace('\n', &format!("\n{}", " ".repeat(indent)))
}

fn format_values(values: &[f64], precision: usize) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{v:.precision$}")).collect();
    format!("[{}]", items.join(", "))
}

/// Full pricing report for one valued contract.
///
/// Sections: calculated price, option parameters, model parameters, and
/// the delta and theta trees. Vega is listed but empty. Tolerated numeric
/// issues are listed last.
#[derive(Debug, Clone)]
pub struct PricingReport<'a> {
    contract: &'a OptionContract,
    valuation: &'a Valuation,
    theta: NodeTree,
    precision: usize,
}

impl<'a> PricingReport<'a> {
    /// Prepares a report.
    pub fn new(
        contract: &'a OptionContract,
        valuation: &'a Valuation,
        precision: usize,
    ) -> ArborResult<Self> {
        Ok(Self {
            contract,
            valuation,
            theta: valuation.theta()?,
            precision,
        })
    }

    fn line(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
        writeln!(f, "{SECTION_INDENT}{label:<LABEL_WIDTH$} : {value}")
    }

    fn tree(&self, levels: &[Vec<f64>]) -> String {
        let indent = SECTION_INDENT.len() + LABEL_WIDTH + 3;
        let rendered = render_tree(levels, self.precision);
        indent_linebreaks(rendered.trim_end(), indent)
    }
}

impl fmt::Display for PricingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.precision;
        let contract = self.contract;

        writeln!(
            f,
            "{:<width$} : {:.p$}",
            "Calculated Option Price",
            self.valuation.price(),
            width = LABEL_WIDTH + SECTION_INDENT.len() + 2
        )?;

        writeln!(f)?;
        writeln!(f, "Option Parameters")?;
        Self::line(f, "Option Type", contract.kind().style())?;
        Self::line(f, "Underlying Asset", contract.underlying())?;
        Self::line(f, "Strike Price", format!("{:.p$}", contract.strike()))?;
        Self::line(f, "Currency", contract.currency())?;
        Self::line(f, "Side", contract.side())?;
        if let Some(payoff) = contract.kind().payoff_style() {
            Self::line(f, "Payoff Type", payoff)?;
        }

        if let Some(model) = contract.model() {
            writeln!(f)?;
            writeln!(f, "Model Parameters")?;
            Self::line(f, "Steps", model.steps())?;
            Self::line(f, "Rates", format_values(model.rates(), p))?;
            Self::line(f, "Volatilities", format_values(model.vols(), p))?;
        }

        writeln!(f)?;
        writeln!(f, "Greeks")?;
        Self::line(f, "Delta", self.tree(self.valuation.delta().levels()))?;
        Self::line(f, "Theta", self.tree(self.theta.levels()))?;
        Self::line(f, "Vega", "[]")?;

        if !self.valuation.is_clean() {
            writeln!(f)?;
            writeln!(f, "Numeric Issues")?;
            for issue in self.valuation.issues() {
                writeln!(f, "{SECTION_INDENT}{issue}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractKind;
    use crate::engine::PricingEngine;
    use arbor_core::{OptionSide, PayoffStyle};
    use arbor_lattice::LatticeModel;

    #[test]
    fn test_render_two_levels() {
        let text = render_tree(&[vec![0.5], vec![1.0, 0.0]], 3);
        assert_eq!(text, "0.500 -> 1.000\n         0.000\n");
    }

    #[test]
    fn test_render_rows_follow_stride() {
        let levels = vec![vec![1.0], vec![2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]];
        let text = render_tree(&levels, 1);
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "1.0 -> 2.0 -> 4.0");
        assert_eq!(rows[1], "              5.0");
        assert_eq!(rows[2], "       3.0 -> 6.0");
        assert_eq!(rows[3], "              7.0");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_tree(&[], 3), "");
    }

    #[test]
    fn test_indent_linebreaks() {
        assert_eq!(indent_linebreaks("a\nb\nc", 2), "a\n  b\n  c");
    }

    #[test]
    fn test_report_sections() {
        let model = LatticeModel::flat_template(2, 0.05, 0.2).unwrap();
        let kind = ContractKind::Averaging {
            payoff: PayoffStyle::Floating,
        };
        let contract = OptionContract::new(100.0, 100.0, 1.0, OptionSide::Put, kind)
            .unwrap()
            .with_underlying("MSFT")
            .with_currency("USD")
            .with_model(&model)
            .unwrap();
        let valuation = PricingEngine::default().valuate(&contract).unwrap();

        let text = PricingReport::new(&contract, &valuation, 3)
            .unwrap()
            .to_string();

        assert!(text.starts_with("Calculated Option Price"));
        assert!(text.contains("Option Type          : Asian"));
        assert!(text.contains("Payoff Type          : Floating"));
        assert!(text.contains("Rates                : [0.050, 0.050]"));
        assert!(text.contains("Vega                 : []"));
        assert!(!text.contains("Numeric Issues"));
    }

    #[test]
    fn test_report_omits_payoff_for_vanilla() {
        let model = LatticeModel::flat_template(1, 0.05, 0.2).unwrap();
        let contract =
            OptionContract::new(100.0, 100.0, 1.0, OptionSide::Call, ContractKind::European)
                .unwrap()
                .with_model(&model)
                .unwrap();
        let valuation = PricingEngine::default().valuate(&contract).unwrap();
        let text = PricingReport::new(&contract, &valuation, 3)
            .unwrap()
            .to_string();

        assert!(text.contains("Option Type          : European"));
        assert!(!text.contains("Payoff Type"));
    }
}
