use crate::config::RemediationParams;
use crate::grid::CellGrid;

/// Cleans the disc of cells around `(x, y)` at simulated day `now`.
///
/// Returns how many cells were touched; an off-grid center touches none.
pub fn apply(grid: &mut CellGrid, x: i32, y: i32, p: &RemediationParams, now: f64) -> usize {
    if grid.get(x, y).is_none() {
        return 0;
    }
    let r = p.remediation_radius.max(0.0);
    let reach = r.floor() as i32;
    let r2 = r * r;
    let mut touched = 0;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if ((dx * dx + dy * dy) as f64) > r2 {
                continue;
            }
            let Some(cell) = grid.get_mut(x + dx, y + dy) else {
                continue;
            };
            let fc = cell.field_capacity();
            cell.toxicity *= 1.0 - p.remediation_toxicity_drop;
            cell.air_toxicity = 0.0;
            cell.moisture = (cell.moisture + p.remediation_moisture_boost * fc).min(fc);
            cell.fungal_cover *= 1.0 - p.remediation_fungal_reduction;
            cell.last_remediation_day = Some(now);
            cell.refresh_state();
            touched += 1;
        }
    }
    touched
}
