//! Shipping estimate inputs.

use crate::lookup_key;

lookup_key! {
    /// Destination region for a shipping estimate.
    pub enum ShippingRegion("shipping region") {
        Northeast => "northeast",
        Southeast => "southeast",
        Midwest => "midwest",
        Southwest => "southwest",
        WestCoast => "west-coast",
        PacificNorthwest => "pacific-northwest",
        AlaskaHawaii => "alaska-hawaii",
        Canada => "canada",
        International => "international",
    }
}

lookup_key! {
    /// Shipping speed requested by the customer.
    #[derive(Default)]
    pub enum ShippingMethod("shipping method") {
        #[default]
        Standard => "standard",
        Express => "express",
        International => "international",
    }
}

impl ShippingMethod {
    /// Whether this method uses the express delivery window.
    ///
    /// `International` is accepted as input but uses the standard window; the
    /// region row carries no separate international delivery time.
    #[must_use]
    pub const fn is_express(self) -> bool {
        matches!(self, Self::Express)
    }
}
