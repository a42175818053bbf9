use crate::model::ExternalVehicle;

/// Case-insensitive substring match over registration number, owner name
/// and owner contact. A blank term keeps everything; any other term is
/// matched as typed, surrounding whitespace included.
pub fn matches(vehicle: &ExternalVehicle, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let q = term.to_lowercase();
    vehicle.reg_number.to_lowercase().contains(&q)
        || vehicle.owner_name.to_lowercase().contains(&q)
        || vehicle.owner_contact.to_lowercase().contains(&q)
}

/// Recompute the filtered view from the canonical collection.
pub fn filter_vehicles(all: &[ExternalVehicle], term: &str) -> Vec<ExternalVehicle> {
    all.iter().filter(|v| matches(v, term)).cloned().collect()
}
