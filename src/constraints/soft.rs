//! Soft constraint / objective builder (`spec.md` §4.3).
//!
//! Builds the single weighted objective `good_lp::Expression` the CP-SAT
//! driver maximizes, the same way the teacher composes
//! `morning_preference_weight * morning_score - back_to_back_penalty_weight
//! * back_to_back_penalty_score` in `solver.rs` — one `Expression` built
//! from sums filtered out of the decision-variable maps, no per-term
//! solver calls.

use good_lp::{constraint, Expression, SolverModel};

use crate::domain::{rank_weight, OptimizationConfig, Student};
use crate::validate::ValidatedSnapshot;
use crate::variables::DecisionVariables;

/// Builds the workload-mean/absolute-deviation linking constraints the
/// variance term in the objective depends on (`mean * |F| = sum(workload)`,
/// `dev_f >= workload_f - mean`, `dev_f >= mean - workload_f`), then
/// returns the full weighted objective expression.
pub fn build_objective<M: SolverModel>(
    model: &mut M,
    validated: &ValidatedSnapshot,
    vars: &DecisionVariables,
    config: &OptimizationConfig,
) {
    link_workload_mean_and_deviation(model, validated, vars);
    link_student_satisfaction(model, validated, vars, config);
}

fn link_workload_mean_and_deviation<M: SolverModel>(
    model: &mut M,
    validated: &ValidatedSnapshot,
    vars: &DecisionVariables,
) {
    let faculty_count = validated.snapshot.faculty.len() as f64;
    if faculty_count == 0.0 {
        return;
    }
    let total_workload: Expression = vars.faculty_workload.values().map(|v| *v).sum();
    let mean = vars.workload_mean;
    model.add_constraint(constraint!(faculty_count * mean == total_workload));

    for faculty in &validated.snapshot.faculty {
        let workload = *vars
            .faculty_workload
            .get(&faculty.id)
            .expect("workload variable built for every faculty member");
        let deviation = *vars
            .workload_deviation
            .get(&faculty.id)
            .expect("deviation variable built for every faculty member");
        model.add_constraint(constraint!(deviation >= workload - mean));
        model.add_constraint(constraint!(deviation >= mean - workload));
    }
}

/// Links each student's auxiliary satisfaction variable to the bound
/// elective indicators, weighted by §4.3's `rank_weight`:
/// `satisfaction_s * |preferences_s| == Σ_c rank_weight(priority(s,c)) * elective_assign[s,c]`.
fn link_student_satisfaction<M: SolverModel>(
    model: &mut M,
    validated: &ValidatedSnapshot,
    vars: &DecisionVariables,
    config: &OptimizationConfig,
) {
    for student in &validated.snapshot.students {
        let Some(&satisfaction_var) = vars.student_satisfaction.get(&student.id) else {
            continue;
        };
        if student.preferences.is_empty() {
            model.add_constraint(constraint!(satisfaction_var == 0));
            continue;
        }
        let weighted_sum = weighted_elective_sum(student, vars, config);
        let denom = student.preferences.len() as f64;
        model.add_constraint(constraint!(denom * satisfaction_var == weighted_sum));
    }
}

fn weighted_elective_sum(
    student: &Student,
    vars: &DecisionVariables,
    config: &OptimizationConfig,
) -> Expression {
    let mut sum = Expression::from(0);
    for pref in &student.preferences {
        if let Some(var) = vars
            .elective_assign
            .get(&(student.id.clone(), pref.course_id.clone()))
        {
            let weight = rank_weight(pref.priority, config.p_max);
            sum += weight * *var;
        }
    }
    sum
}

/// The full weighted objective from `spec.md` §4.3, built once
/// `build_objective`'s linking constraints are already queued.
pub fn objective_expression(
    validated: &ValidatedSnapshot,
    vars: &DecisionVariables,
    config: &OptimizationConfig,
) -> Expression {
    let satisfaction_term: Expression = vars.student_satisfaction.values().map(|v| *v).sum();
    let workload_variance_term: Expression = vars.workload_deviation.values().map(|v| *v).sum();
    let utilization_term: Expression = vars.room_utilization.values().map(|v| *v).sum();

    let elective_term: Expression = vars
        .elective_assign
        .iter()
        .map(|((student_id, course_id), var)| {
            let weight = validated
                .snapshot
                .students
                .iter()
                .find(|s| &s.id == student_id)
                .and_then(|s| s.preference_for(course_id))
                .map(|pref| rank_weight(pref.priority, config.p_max))
                .unwrap_or(0.0);
            weight * *var
        })
        .sum();

    let nep_term: Expression = validated
        .snapshot
        .courses
        .iter()
        .filter(|c| c.is_nep_compliant)
        .filter_map(|c| vars.course_scheduled.get(&c.id))
        .map(|v| *v)
        .sum();

    let interdisciplinary_term: Expression = validated
        .snapshot
        .courses
        .iter()
        .filter(|c| c.is_interdisciplinary())
        .filter_map(|c| vars.course_scheduled.get(&c.id))
        .map(|v| *v)
        .sum();

    config.satisfaction_weight * satisfaction_term - config.workload_weight * workload_variance_term
        + config.utilization_weight * utilization_term
        + config.elective_preference_weight * elective_term
        + config.nep_weight * nep_term
        + config.interdisciplinary_weight * interdisciplinary_term
}
