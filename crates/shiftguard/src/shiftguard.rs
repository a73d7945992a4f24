//! Main Shiftguard struct and public API.

use std::path::Path;

use tracing::{info, warn};

use crate::config::ShiftguardConfig;
use crate::error::{Result, ShiftguardError};
use crate::inference::{extract_shift_legend, LayoutInferencer, ShiftClassifier};
use crate::input::{Parser, ParserConfig, SourceMetadata, TableView};
use crate::report::{
    CheckReport, EmployeeSummary, PipelineOutcome, RuleReport, RuleSummary, ScheduleReport,
    ScheduleSummary, ShiftDistribution,
};
use crate::rules::{CrossAssignmentAnalyzer, RuleMapBuilder};
use crate::schema::TableLayout;
use crate::validation::ScheduleValidator;

/// The main Shiftguard analysis engine.
///
/// Holds one rule set and runs the schedule pipeline (layout inference,
/// validation) and the rule pipeline (mapping, cross-assignment analysis).
pub struct Shiftguard {
    config: ShiftguardConfig,
    parser: Parser,
    inferencer: LayoutInferencer,
    validator: ScheduleValidator,
    rules: RuleMapBuilder,
    strict: bool,
}

impl Shiftguard {
    /// Create an instance with the default rule set.
    pub fn new() -> Result<Self> {
        Self::with_config(ShiftguardConfig::default())
    }

    /// Create an instance with a custom rule set.
    pub fn with_config(config: ShiftguardConfig) -> Result<Self> {
        config.validate()?;

        let classifier = ShiftClassifier::new(config.vocabulary.clone());
        let inferencer = LayoutInferencer::new(config.layout.clone(), classifier)?;
        let validator = ScheduleValidator::new(&config);

        Ok(Self {
            config,
            parser: Parser::new(),
            inferencer,
            validator,
            rules: RuleMapBuilder::new(),
            strict: false,
        })
    }

    /// Use a custom loader configuration.
    pub fn with_parser(mut self, config: ParserConfig) -> Self {
        self.parser = Parser::with_config(config);
        self
    }

    /// Reject schedules whose layout needed fallback heuristics.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The rule set in use.
    pub fn config(&self) -> &ShiftguardConfig {
        &self.config
    }

    /// Infer a schedule layout, enforcing strict mode when enabled.
    pub fn infer_layout(&self, table: &TableView) -> Result<TableLayout> {
        let layout = self.inferencer.infer(table)?;
        if self.strict {
            layout.require_confident()?;
        }
        Ok(layout)
    }

    /// Validate a schedule sheet.
    pub fn analyze_schedule(&self, table: &TableView) -> Result<ScheduleReport> {
        self.schedule_report(table, None)
    }

    /// Load and validate a schedule file.
    pub fn analyze_schedule_file(&self, path: impl AsRef<Path>) -> Result<ScheduleReport> {
        let (table, source) = self.parser.parse_file(path)?;
        self.schedule_report(&table, Some(source))
    }

    /// Map a rule sheet and analyze cross assignments.
    pub fn analyze_rules(&self, table: &TableView) -> Result<RuleReport> {
        self.rule_report(table, None)
    }

    /// Load and map a rule file.
    pub fn analyze_rules_file(&self, path: impl AsRef<Path>) -> Result<RuleReport> {
        let (table, source) = self.parser.parse_file(path)?;
        self.rule_report(&table, Some(source))
    }

    /// Run both pipelines; a failure in one never stops the other.
    pub fn check(&self, schedule: &TableView, rules: &TableView) -> CheckReport {
        CheckReport {
            schedule: self.outcome("schedule", self.analyze_schedule(schedule)),
            rules: self.outcome("rules", self.analyze_rules(rules)),
        }
    }

    /// Load both files and run both pipelines.
    pub fn check_files(
        &self,
        schedule: impl AsRef<Path>,
        rules: impl AsRef<Path>,
    ) -> CheckReport {
        CheckReport {
            schedule: self.outcome("schedule", self.analyze_schedule_file(schedule)),
            rules: self.outcome("rules", self.analyze_rules_file(rules)),
        }
    }

    fn outcome<T>(&self, pipeline: &str, result: Result<T>) -> PipelineOutcome<T> {
        if let Err(e) = &result {
            warn!(pipeline, error = %e, "pipeline failed");
        }
        PipelineOutcome::from_result(result)
    }

    fn schedule_report(
        &self,
        table: &TableView,
        source: Option<SourceMetadata>,
    ) -> Result<ScheduleReport> {
        if table.row_count() == 0 {
            return Err(ShiftguardError::EmptyData(
                "schedule sheet has no rows".to_string(),
            ));
        }

        let layout = self.infer_layout(table)?;
        let legend = extract_shift_legend(table, layout.header_row);
        let outcome = self.validator.validate(table, &layout);

        let employees = outcome
            .rows
            .employees
            .iter()
            .map(EmployeeSummary::from_row)
            .collect();
        let distribution = ShiftDistribution::from_rows(&outcome.rows);
        let summary = ScheduleSummary::compute(&outcome.rows, &outcome.findings, &layout);

        info!(
            header_row = layout.header_row,
            employees = summary.employee_rows,
            violations = summary.findings_by_severity.violation,
            warnings = summary.findings_by_severity.warning,
            "schedule analyzed"
        );

        Ok(ScheduleReport {
            source,
            layout,
            legend,
            findings: outcome.findings,
            employees,
            distribution,
            skipped: outcome.rows.skipped,
            summary,
        })
    }

    fn rule_report(&self, table: &TableView, source: Option<SourceMetadata>) -> Result<RuleReport> {
        if table.row_count() == 0 {
            return Err(ShiftguardError::EmptyData("rule sheet has no rows".to_string()));
        }

        let map = self.rules.build(table)?;
        let cross = CrossAssignmentAnalyzer::analyze(&map);
        let summary = RuleSummary::compute(&map, &cross);

        Ok(RuleReport {
            source,
            map,
            cross,
            summary,
        })
    }
}
