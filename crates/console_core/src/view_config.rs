//! Per-kind configuration values for the generic table controller.

use shared::domain::{Record, RecordKind, StatusVocabulary};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub path: &'static str,
}

const fn col(label: &'static str, path: &'static str) -> Column {
    Column { label, path }
}

impl Column {
    /// Cell text for `record`. `createdAt` renders as a date and
    /// `parkingCombined` joins the bike and car parking answers.
    pub fn text(&self, record: &Record) -> String {
        match self.path {
            "createdAt" => record
                .created_at()
                .map(|at| at.format("%d %b %Y").to_string())
                .unwrap_or_default(),
            "parkingCombined" => format!(
                "{}/{}",
                record.field_text("bikeparking"),
                record.field_text("carparking")
            ),
            path => record.field_text(path),
        }
    }
}

const LISTING_COLUMNS: &[Column] = &[
    col("Address", "address"),
    col("Building", "building"),
    col("Type", "type"),
    col("Furnishing", "furnishing"),
    col("Tenant", "tenantType"),
    col("Parking", "parkingCombined"),
    col("Power", "powerBackup"),
    col("Geyser", "geyser"),
    col("Security", "security"),
    col("CCTV", "cctv"),
    col("Bath", "bathrooms"),
    col("Floor", "floor"),
    col("Flat", "flat"),
    col("Colony", "colony"),
    col("Area", "area"),
    col("Pincode", "pincode"),
    col("Rent", "rent"),
    col("Advance", "advance"),
    col("Contact", "contact"),
];

const VISIT_COLUMNS: &[Column] = &[
    col("Visit ID", "visitId"),
    col("Name", "name"),
    col("Phone", "phone"),
    col("Date", "date"),
    col("Slot", "slot"),
    col("Building", "property.building"),
    col("Colony", "property.colony"),
    col("Area", "property.area"),
    col("Requested On", "createdAt"),
];

const LOCATION_COLUMNS: &[Column] = &[
    col("Name", "name"),
    col("Mobile", "mobile"),
    col("Preferred Location", "preferredLocation"),
    col("Home Type", "homeType"),
    col("Requested On", "createdAt"),
];

const MOVE_COLUMNS: &[Column] = &[
    col("Move ID", "moveId"),
    col("Current Location", "currentLocation"),
    col("Preferred Location", "preferredLocation"),
    col("Distance (km)", "distanceKm"),
    col("Room Type", "roomType"),
    col("Move Date", "moveDate"),
    col("Total Amount", "totalAmount"),
    col("Requested On", "createdAt"),
];

const MOVE_DETAIL_COLUMNS: &[Column] = &[
    col("Move ID", "moveId"),
    col("Phone", "phone"),
    col("Current Location", "currentLocation"),
    col("Preferred Location", "preferredLocation"),
    col("Distance (km)", "distanceKm"),
    col("Room Type", "roomType"),
    col("Vehicle Name", "selectedVehicle.name"),
    col("Vehicle Capacity", "selectedVehicle.cap"),
    col("Furnishing", "furnishingType"),
    col("Tenant Type", "tenantType"),
    col("Budget", "budgetRange"),
    col("Move Date", "moveDate"),
    col("Extra Cartons", "extraCartons"),
    col("Video Tour", "videoTour"),
    col("Total Amount", "totalAmount"),
    col("Status", "status"),
];

const POSTING_COLUMNS: &[Column] = &[
    col("Building", "building"),
    col("Area", "area"),
    col("Type", "type"),
    col("Furnishing", "furnishing"),
    col("Rent", "rent"),
    col("Posted On", "createdAt"),
];

const POSTING_DETAIL_COLUMNS: &[Column] = &[
    col("Building", "building"),
    col("Area", "area"),
    col("Type", "type"),
    col("Furnishing", "furnishing"),
    col("Tenant Type", "tenantType"),
    col("Bathrooms", "bathrooms"),
    col("Floor", "floor"),
    col("Flat No", "flat"),
    col("Pincode", "pincode"),
    col("Rent", "rent"),
    col("Advance", "advance"),
    col("Contact", "contact"),
    col("Parking (Bike/Car)", "parkingCombined"),
    col("Power Backup", "powerBackup"),
    col("Security", "security"),
    col("CCTV", "cctv"),
];

/// Where the full record behind the detail overlay comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    None,
    /// `GET <collection>/<key>`, keyed by `key_field` (record identity when absent).
    Remote { key_field: &'static str },
    /// The already-fetched snapshot entry.
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub kind: RecordKind,
    pub collection_path: &'static str,
    pub search_fields: &'static [&'static str],
    pub statuses: StatusVocabulary,
    pub columns: &'static [Column],
    pub detail: DetailSource,
    pub detail_columns: &'static [Column],
}

impl ViewConfig {
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::PropertyListing => Self {
                kind,
                collection_path: "properties",
                search_fields: &["building", "area"],
                statuses: kind.statuses(),
                columns: LISTING_COLUMNS,
                detail: DetailSource::None,
                detail_columns: &[],
            },
            RecordKind::VisitRequest => Self {
                kind,
                collection_path: "visit-request",
                search_fields: &["property.building", "property.area", "visitId"],
                statuses: kind.statuses(),
                columns: VISIT_COLUMNS,
                detail: DetailSource::None,
                detail_columns: &[],
            },
            RecordKind::LocationRequest => Self {
                kind,
                collection_path: "location-requests",
                search_fields: &["name", "mobile", "preferredLocation", "homeType"],
                statuses: kind.statuses(),
                columns: LOCATION_COLUMNS,
                detail: DetailSource::None,
                detail_columns: &[],
            },
            RecordKind::MoveRequest => Self {
                kind,
                collection_path: "move-request",
                search_fields: &["moveId", "currentLocation", "preferredLocation"],
                statuses: kind.statuses(),
                columns: MOVE_COLUMNS,
                detail: DetailSource::Remote { key_field: "moveId" },
                detail_columns: MOVE_DETAIL_COLUMNS,
            },
            RecordKind::OwnerPosting => Self {
                kind,
                collection_path: "owner-postings",
                search_fields: &["area", "building", "type"],
                statuses: kind.statuses(),
                columns: POSTING_COLUMNS,
                detail: DetailSource::Snapshot,
                detail_columns: POSTING_DETAIL_COLUMNS,
            },
        }
    }

    /// Key the detail endpoint is addressed by for `record`.
    pub fn detail_key(&self, record: &Record) -> String {
        match self.detail {
            DetailSource::Remote { key_field } => {
                let key = record.field_text(key_field);
                if key.trim().is_empty() {
                    record.id.to_string()
                } else {
                    key
                }
            }
            DetailSource::None | DetailSource::Snapshot => record.id.to_string(),
        }
    }

    pub fn status_of(&self, record: &Record) -> &'static str {
        self.statuses.resolve(record.raw_status())
    }
}

#[cfg(test)]
#[path = "tests/view_config_tests.rs"]
mod tests;
