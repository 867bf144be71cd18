//! Built-in sample snapshots matching the demo dashboard's sections.
//!
//! Each sample pairs the section label the dashboard uses with the data
//! snapshot it charts, so the CLI can exercise the gateway without a running
//! front-end.

use serde_json::{json, Value};

pub const SECTION_NAMES: &[&str] = &[
    "warehouse-overtime",
    "warehouse-inefficiency",
    "logistics-reservations",
    "transport-load",
];

/// Resolve a section name to its `(context, data)` pair.
pub fn sample_data(section: &str) -> Option<(&'static str, Value)> {
    match section {
        "warehouse-overtime" => Some((
            "Warehouse Operations & KPIs",
            json!([
                { "day": "Mon", "hours": 42 },
                { "day": "Tue", "hours": 38 },
                { "day": "Wed", "hours": 55 },
                { "day": "Thu", "hours": 22 },
                { "day": "Fri", "hours": 68 },
                { "day": "Sat", "hours": 40 }
            ]),
        )),
        "warehouse-inefficiency" => Some((
            "Inefficiency & Cost Leakage Audit",
            json!([
                { "type": "unnecessaryMovements", "detail": "Section A to C Forklift Loop", "count": 145, "costPer": 2.5, "waitTime": "N/A" },
                { "type": "pickingCancellations", "detail": "Order ID: #4401 - Out of Stock", "count": 12, "costPer": 15.0, "waitTime": "N/A" },
                { "type": "productWaitTime", "detail": "SKU-882 Staging Area", "count": 4, "costPer": 50.0, "waitTime": "18h Avg" },
                { "type": "unnecessaryMovements", "detail": "Manual Re-tagging Area", "count": 88, "costPer": 1.2, "waitTime": "N/A" },
                { "type": "pickingCancellations", "detail": "Customer Change #9910", "count": 5, "costPer": 12.0, "waitTime": "N/A" }
            ]),
        )),
        "logistics-reservations" => Some((
            "Reservation Performance & Capital Costs",
            json!([
                { "rep": "Alice Smith", "customer": "Global Tech Ltd", "product": "Precision Gears V2", "qty": 500, "waitDays": 22, "unitProfit": 45, "holdingCostPerDay": 0.5 },
                { "rep": "John Doe", "customer": "Standard Solutions", "product": "Motor Unit X1", "qty": 200, "waitDays": 5, "unitProfit": 120, "holdingCostPerDay": 1.2 },
                { "rep": "Alice Smith", "customer": "Apex Corp", "product": "Sensor Array Z", "qty": 1000, "waitDays": 18, "unitProfit": 15, "holdingCostPerDay": 0.2 },
                { "rep": "Michael Brown", "customer": "Future Builders", "product": "Heavy Pump Set", "qty": 50, "waitDays": 35, "unitProfit": 800, "holdingCostPerDay": 5.0 },
                { "rep": "Sarah Wilson", "customer": "Eco Energy", "product": "Battery Module 5K", "qty": 300, "waitDays": 12, "unitProfit": 210, "holdingCostPerDay": 2.5 },
                { "rep": "John Doe", "customer": "City Infra", "product": "Steel Support B", "qty": 5000, "waitDays": 8, "unitProfit": 5, "holdingCostPerDay": 0.1 }
            ]),
        )),
        "transport-load" => Some((
            "Transportation & Fleet Load Factor",
            json!([
                { "type": "Import", "loadFactor": 88, "count": 12 },
                { "type": "Export", "loadFactor": 95, "count": 8 },
                { "type": "Local", "loadFactor": 72, "count": 24 }
            ]),
        )),
        _ => None,
    }
}
