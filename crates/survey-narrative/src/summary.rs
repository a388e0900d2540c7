//! Offline narrative for one category's department scores.

use statrs::statistics::Statistics;
use survey_analysis::queries::department::DepartmentScore;
use survey_core::types::Instrument;

/// A fixed-template summary of `scores`, which must be ordered by average
/// descending (as `category_department_scores` returns them).
pub fn summarize_category_scores(scores: &[DepartmentScore], instrument: Instrument, category: &str) -> String {
    let (Some(best), Some(worst)) = (scores.first(), scores.last()) else {
        return format!("{category}: no responses.");
    };

    let averages: Vec<f64> = scores.iter().map(|s| s.avg_score).collect();
    let overall = averages.iter().mean();
    let spread = Statistics::max(averages.iter()) - Statistics::min(averages.iter());

    let stds: Vec<f64> = scores.iter().filter_map(|s| s.std_score).collect();
    let mean_std = if stds.is_empty() {
        "n/a".to_string()
    } else {
        format!("{:.2}", stds.iter().mean())
    };

    let midpoint = instrument.midpoint();
    let above = averages.iter().filter(|&&a| a > midpoint).count();
    let above_pct = above as f64 * 100.0 / averages.len() as f64;

    let mut out = String::new();
    out.push_str(&format!("{category} results:\n\n"));
    out.push_str(&format!("1. Overall average: {overall:.2}\n"));
    out.push_str(&format!("2. Highest department: {} ({:.2})\n", best.department, best.avg_score));
    out.push_str(&format!("3. Lowest department: {} ({:.2})\n", worst.department, worst.avg_score));
    out.push_str(&format!("4. Average spread within departments: {mean_std}\n\n"));
    out.push_str("Key points:\n");
    out.push_str(&format!("- Department averages differ by {spread:.2} points\n"));
    out.push_str(&format!(
        "- {above_pct:.1}% of departments score above the scale midpoint ({midpoint:.1})\n"
    ));
    out
}
