use crate::ride::{Ride, TableRow};

/// Rides crossing water on a ferry are left out entirely, not just the ferry
/// rows.
pub fn is_valid_ride(ride: &Ride) -> bool {
    !ride.table.iter().any(TableRow::is_ferry)
}
