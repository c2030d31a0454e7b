//! Store location and customer support inputs.

use crate::lookup_key;

lookup_key! {
    /// City with (or planned to have) a physical cafe.
    pub enum City("city") {
        Seattle => "seattle",
        Portland => "portland",
        SanFrancisco => "san-francisco",
        Austin => "austin",
        NewYork => "new-york",
    }
}

lookup_key! {
    /// How quickly the customer needs help.
    #[derive(Default)]
    pub enum Urgency("urgency") {
        Low => "low",
        #[default]
        Medium => "medium",
        High => "high",
    }
}

lookup_key! {
    /// Support queue a request is routed to.
    pub enum SupportCategory("support category") {
        OrderIssue => "order-issue",
        ProductQuality => "product-quality",
        Subscription => "subscription",
        Wholesale => "wholesale",
        General => "general",
    }
}
