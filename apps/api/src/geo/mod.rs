// Geolocation: derives latitude/longitude/date from a property's address.
// The provider is an external collaborator behind the `Geocoder` trait.

pub mod geocoder;
pub mod geolocation;

pub use geocoder::{Geocoder, NominatimGeocoder};
pub use geolocation::{compute_geolocation, Address, Geolocation};
