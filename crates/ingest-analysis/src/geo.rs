// ABOUTME: Great-circle distance between GPS points using the haversine formula
// ABOUTME: Route length and cumulative distance helpers, all in kilometers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::geo::EARTH_RADIUS_KM;
use crate::models::GeoPoint;

/// Haversine distance in kilometers between two coordinates in decimal degrees
#[must_use]
pub fn haversine_km_coords(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance in kilometers between two route points
#[must_use]
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_km_coords(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Total length of a route in kilometers, in the order given
#[must_use]
pub fn route_length_km(route: &[GeoPoint]) -> f64 {
    route.windows(2).map(|pair| haversine_km(&pair[0], &pair[1])).sum()
}

/// Running distance from the first point, one entry per point
#[must_use]
pub fn cumulative_distances_km(route: &[GeoPoint]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(route.len());
    let mut total = 0.0;
    for (i, point) in route.iter().enumerate() {
        if i > 0 {
            total += haversine_km(&route[i - 1], point);
        }
        cumulative.push(total);
    }
    cumulative
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::f64::consts::PI;

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_km_coords(0.0, 0.0, 1.0, 0.0);
        assert!((d - EARTH_RADIUS_KM * PI / 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let paris = (48.8566, 2.3522);
        let london = (51.5074, -0.1278);
        let there = haversine_km_coords(paris.0, paris.1, london.0, london.1);
        let back = haversine_km_coords(london.0, london.1, paris.0, paris.1);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 343.5).abs() < 1.0);
        assert!(haversine_km_coords(paris.0, paris.1, paris.0, paris.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cumulative_matches_route_length() {
        let now = Utc::now();
        let route = vec![
            GeoPoint::new(45.0, 7.0, now),
            GeoPoint::new(45.001, 7.0, now),
            GeoPoint::new(45.001, 7.002, now),
            GeoPoint::new(45.003, 7.002, now),
        ];
        let cumulative = cumulative_distances_km(&route);
        assert_eq!(cumulative.len(), 4);
        assert!(cumulative[0].abs() < f64::EPSILON);
        assert!((cumulative[3] - route_length_km(&route)).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_routes() {
        assert!(route_length_km(&[]).abs() < f64::EPSILON);
        assert!(cumulative_distances_km(&[]).is_empty());
    }
}
