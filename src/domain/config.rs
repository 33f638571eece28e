use serde::{Deserialize, Serialize};

/// Objective weights and solver/allocator bounds, per §3. Defaults mirror
/// `OptimizationConfig` in `original_source/src/ml/data/models.py`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConfig {
    #[serde(default = "default_time_budget")]
    pub max_optimization_time_s: u64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    #[serde(default = "default_satisfaction_weight")]
    pub satisfaction_weight: f64,
    #[serde(default = "default_workload_weight")]
    pub workload_weight: f64,
    #[serde(default = "default_utilization_weight")]
    pub utilization_weight: f64,
    #[serde(default = "default_elective_weight")]
    pub elective_preference_weight: f64,
    #[serde(default = "default_nep_weight")]
    pub nep_weight: f64,
    #[serde(default = "default_interdisciplinary_weight")]
    pub interdisciplinary_weight: f64,
    #[serde(default = "default_carry_forward_weight")]
    pub carry_forward_weight: f64,
    #[serde(default = "default_section_balance_weight")]
    pub section_balance_weight: f64,

    #[serde(default = "default_max_electives")]
    pub max_electives_per_student: u32,
    #[serde(default = "default_min_electives")]
    pub min_electives_per_student: u32,

    #[serde(default = "default_p_max")]
    pub p_max: u32,
}

fn default_time_budget() -> u64 {
    300
}
fn default_max_iterations() -> u32 {
    1000
}
fn default_satisfaction_weight() -> f64 {
    1.0
}
fn default_workload_weight() -> f64 {
    0.8
}
fn default_utilization_weight() -> f64 {
    0.6
}
fn default_elective_weight() -> f64 {
    1.2
}
fn default_nep_weight() -> f64 {
    1.0
}
fn default_interdisciplinary_weight() -> f64 {
    0.9
}
fn default_carry_forward_weight() -> f64 {
    0.7
}
fn default_section_balance_weight() -> f64 {
    0.5
}
fn default_max_electives() -> u32 {
    5
}
fn default_min_electives() -> u32 {
    1
}
fn default_p_max() -> u32 {
    5
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        OptimizationConfig {
            max_optimization_time_s: default_time_budget(),
            max_iterations: default_max_iterations(),
            satisfaction_weight: default_satisfaction_weight(),
            workload_weight: default_workload_weight(),
            utilization_weight: default_utilization_weight(),
            elective_preference_weight: default_elective_weight(),
            nep_weight: default_nep_weight(),
            interdisciplinary_weight: default_interdisciplinary_weight(),
            carry_forward_weight: default_carry_forward_weight(),
            section_balance_weight: default_section_balance_weight(),
            max_electives_per_student: default_max_electives(),
            min_electives_per_student: default_min_electives(),
            p_max: default_p_max(),
        }
    }
}

/// One of the five fixed weight profiles the Pareto orchestrator (§4.8)
/// sweeps over. Mirrors the `strategies` roster in
/// `original_source/src/ml/core/pareto_optimizer.py`, generalized to this
/// crate's 8-term objective rather than the original's 4-term placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    SatisfactionFocus,
    WorkloadFocus,
    UtilizationFocus,
    NepFocus,
    Balanced,
}

impl WeightProfile {
    pub const ROSTER: [WeightProfile; 5] = [
        WeightProfile::SatisfactionFocus,
        WeightProfile::WorkloadFocus,
        WeightProfile::UtilizationFocus,
        WeightProfile::NepFocus,
        WeightProfile::Balanced,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeightProfile::SatisfactionFocus => "Satisfaction Focus",
            WeightProfile::WorkloadFocus => "Workload Balance",
            WeightProfile::UtilizationFocus => "Resource Utilization",
            WeightProfile::NepFocus => "NEP Compliance",
            WeightProfile::Balanced => "Balanced",
        }
    }

    /// Human-readable gloss of which weight vector this profile favors,
    /// surfaced in the multi-schedule response (`spec.md` §6) alongside
    /// `name`.
    pub fn description(&self) -> &'static str {
        match self {
            WeightProfile::SatisfactionFocus => "Maximizes student elective preference satisfaction above all else",
            WeightProfile::WorkloadFocus => "Spreads teaching load evenly across faculty",
            WeightProfile::UtilizationFocus => "Maximizes room and time-slot utilization",
            WeightProfile::NepFocus => "Weights NEP 2020 compliance terms most heavily",
            WeightProfile::Balanced => "Equal weight across satisfaction, workload, utilization and NEP compliance",
        }
    }

    /// Applies this profile's normalized weight vector on top of a base
    /// config, replacing the satisfaction/workload/utilization/NEP
    /// weights while leaving the remaining terms (elective preference,
    /// interdisciplinary, carry-forward, section balance) untouched.
    pub fn apply(&self, base: &OptimizationConfig) -> OptimizationConfig {
        let (sat, wl, util, nep) = match self {
            WeightProfile::SatisfactionFocus => (0.6, 0.2, 0.1, 0.1),
            WeightProfile::WorkloadFocus => (0.2, 0.6, 0.1, 0.1),
            WeightProfile::UtilizationFocus => (0.1, 0.2, 0.6, 0.1),
            WeightProfile::NepFocus => (0.2, 0.2, 0.2, 0.4),
            WeightProfile::Balanced => (0.25, 0.25, 0.25, 0.25),
        };
        OptimizationConfig {
            satisfaction_weight: sat,
            workload_weight: wl,
            utilization_weight: util,
            nep_weight: nep,
            ..base.clone()
        }
    }
}
