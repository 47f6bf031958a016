use std::sync::Arc;

use nalgebra::Vector3;

use crate::model::selector::{BondRegion, SiteRegion};

/// Convenience constructors for common region predicates

/// Sites within (or on) a sphere of given radius around `center`.
pub fn within_circle(center: Vector3<f64>, radius: f64) -> SiteRegion {
    Arc::new(move |r: &Vector3<f64>| (r - center).norm() <= radius)
}

/// Sites within an axis-aligned box of the given half-widths around `center`.
pub fn within_rectangle(center: Vector3<f64>, half_widths: Vector3<f64>) -> SiteRegion {
    Arc::new(move |r: &Vector3<f64>| {
        let d = r - center;
        d.x.abs() <= half_widths.x && d.y.abs() <= half_widths.y && d.z.abs() <= half_widths.z
    })
}

/// Sites on the side of the plane `normal · r <= offset`.
pub fn half_space(normal: Vector3<f64>, offset: f64) -> SiteRegion {
    Arc::new(move |r: &Vector3<f64>| normal.dot(r) <= offset)
}

/// Lift a site region to a bond region testing only the bond center.
pub fn bond_center_within(region: SiteRegion) -> BondRegion {
    Arc::new(move |r: &Vector3<f64>, _dr: &Vector3<f64>| region(r))
}
