//! `show`: print a record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use enchant_core::{
    DerivedStep, Enchantment, EnchantmentRecord, EnchantmentStep, MaterialCosts, StepId,
};
use serde::Serialize;

use super::{Session, require_file};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Configuration and final totals
    #[default]
    Summary,
    /// One line per step
    Steps,
    /// Every derived field as JSON
    Json,
}

/// Import, replay and print a record
#[derive(Parser, Debug)]
pub struct Show {
    /// Record JSON file
    pub record: PathBuf,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl Show {
    pub fn execute(self, session: &Session) -> Result<()> {
        require_file(&self.record)?;
        let record = session.load_record(&self.record)?;

        match self.format {
            OutputFormat::Summary => print_summary(&record),
            OutputFormat::Steps => print_steps(&record),
            OutputFormat::Json => {
                let view = LedgerView::new(&record);
                let json = serde_json::to_string_pretty(&view).context("Failed to encode ledger")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}

pub(crate) fn print_summary(record: &EnchantmentRecord) {
    let config = record.config();
    println!("{}", style("Enchantment record").green().bold());
    println!(
        "  Equipment:  {} (player level {})",
        style(config.equipment_type).cyan(),
        config.player_level
    );
    println!(
        "  Potential:  {} → {} (base {})",
        config.equipment_potential,
        style(record.final_potential()).bold(),
        config.base_equipment_potential
    );
    println!("  Steps:      {}", record.len());

    match record.final_success_rates() {
        Some(rates) => println!(
            "  Success:    {}% single, {}% expected",
            rates.single,
            style(rates.expected).bold()
        ),
        None => println!("  Success:    {}", style("no counted steps").dim()),
    }

    let properties = record.current_properties();
    if !properties.is_empty() {
        let line = properties
            .iter()
            .map(|(id, value)| format!("{id} {value:+}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  Properties: {line}");
    }

    println!("  Materials:  {}", format_materials(&record.final_material_totals()));
}

pub(crate) fn print_steps(record: &EnchantmentRecord) {
    if record.is_empty() {
        println!("{}", style("(no steps)").dim());
        return;
    }
    for (index, step) in record.steps().iter().enumerate() {
        println!("{}", format_step_line(index, step));
    }
}

pub(crate) fn format_step_line(index: usize, step: &EnchantmentStep) -> String {
    let derived = step.derived();
    let entries = if step.enchantments().is_empty() {
        "-".to_owned()
    } else {
        step.to_string()
    };
    let header = format!("{:>3}. {:<8}", index + 1, step.id().as_str());
    if step.is_ignored() {
        return format!("{} {}", header, style(entries).dim());
    }
    format!(
        "{} {}  potential {} → {} ({:+}, ×{})  rate {}% / {}%  materials {}",
        header,
        entries,
        derived.pre_enchantment_potential,
        derived.post_enchantment_potential,
        derived.potential_change,
        derived.multiplier,
        derived.single_success_rate,
        derived.expected_success_rate,
        derived.material_costs.total()
    )
}

pub(crate) fn format_materials(costs: &MaterialCosts) -> String {
    let parts: Vec<_> = costs
        .iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(material, amount)| format!("{material} {amount}"))
        .collect();
    if parts.is_empty() {
        return "none".to_owned();
    }
    format!("{} (total {})", parts.join(", "), costs.total())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LedgerView<'a> {
    final_potential: i64,
    final_material_totals: MaterialCosts,
    steps: Vec<StepView<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepView<'a> {
    id: &'a StepId,
    enchantments: &'a [Enchantment],
    is_ignored: bool,
    derived: &'a DerivedStep,
}

impl<'a> LedgerView<'a> {
    fn new(record: &'a EnchantmentRecord) -> Self {
        Self {
            final_potential: record.final_potential(),
            final_material_totals: record.final_material_totals(),
            steps: record
                .steps()
                .iter()
                .map(|step| StepView {
                    id: step.id(),
                    enchantments: step.enchantments(),
                    is_ignored: step.is_ignored(),
                    derived: step.derived(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use enchant_core::{
        EnchantCategory, Hundredths, MaterialType, PropertyCatalog, PropertyDefinition,
        RecordConfig, StepDraft,
    };

    use super::*;

    fn record() -> EnchantmentRecord {
        let catalog = PropertyCatalog::new([PropertyDefinition::new(
            "str",
            "STR",
            EnchantCategory::Stats,
            10,
            MaterialType::Beast,
            Hundredths::from_int(4),
        )])
        .expect("catalog");
        let mut record =
            EnchantmentRecord::new(Arc::new(catalog), RecordConfig::default()).expect("record");
        record
            .add_step(StepDraft::new([Enchantment::new("str", 2)]))
            .expect("add");
        record
    }

    #[test]
    fn materials_list_only_used_types() {
        let record = record();
        // 4 × 1 + 4 × 4
        assert_eq!(
            format_materials(&record.final_material_totals()),
            "beast 20 (total 20)"
        );
        assert_eq!(format_materials(&MaterialCosts::default()), "none");
    }

    #[test]
    fn step_line_shows_potential_flow() {
        console::set_colors_enabled(false);
        let record = record();
        let line = format_step_line(0, &record.steps()[0]);
        assert!(line.contains("step-1"));
        assert!(line.contains("str +2"));
        assert!(line.contains("potential 100 → 80 (-20, ×1.00)"));
    }

    #[test]
    fn json_view_uses_camel_case() {
        let record = record();
        let json = serde_json::to_value(LedgerView::new(&record)).expect("json");
        assert_eq!(json["finalPotential"], 80);
        assert_eq!(json["steps"][0]["isIgnored"], false);
        assert_eq!(json["steps"][0]["derived"]["potential_change"], -20);
    }
}
