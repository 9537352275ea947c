//! Database schema definitions and SQL constants.
//!
//! Dates are stored as ISO-8601 `TEXT` (`YYYY-MM-DD`), which sorts and
//! compares correctly as text, so the overlap predicates run in SQL.
//! Money is stored as decimal `TEXT` and timestamps as RFC 3339 `TEXT`.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Key/value metadata, currently only the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Reservations. `code` is UNIQUE so a duplicate code can never be persisted,
/// whatever the generator does.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id TEXT PRIMARY KEY NOT NULL,
        code TEXT NOT NULL UNIQUE,
        check_in TEXT NOT NULL,
        check_out TEXT NOT NULL,
        adults INTEGER NOT NULL,
        children INTEGER NOT NULL,
        infants INTEGER NOT NULL,
        guest_name TEXT,
        nightly_rate TEXT NOT NULL,
        cleaning_fee TEXT NOT NULL,
        pet_fee TEXT NOT NULL,
        tourist_tax TEXT NOT NULL,
        policy TEXT NOT NULL,
        total_price TEXT NOT NULL,
        applied_credit TEXT NOT NULL,
        amount_due TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        cancelled_at TEXT,
        cancellation_reason TEXT,
        released_from TEXT,
        CHECK (check_out > check_in)
    )";

/// Speeds up the overlap query.
pub const CREATE_STAY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_stay ON reservations(check_in, check_out)";

/// Speeds up status filters.
pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations(status)";

/// Blocked periods; `end_date` is inclusive.
pub const CREATE_BLOCKED_PERIODS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS blocked_periods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        reason TEXT NOT NULL,
        created_at TEXT NOT NULL,
        CHECK (end_date >= start_date)
    )";

/// Credit ledger entries owned by the credit ledger collaborator.
pub const CREATE_CREDIT_ENTRIES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS credit_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reservation_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        earned_at TEXT
    )";

/// Speeds up per-reservation credit lookups.
pub const CREATE_CREDIT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_credit_entries_reservation ON credit_entries(reservation_id, status)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every reservation SELECT, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str = "id, code, check_in, check_out, adults, children, infants, \
     guest_name, nightly_rate, cleaning_fee, pet_fee, tourist_tax, policy, total_price, \
     applied_credit, amount_due, status, created_at, updated_at, cancelled_at, \
     cancellation_reason, released_from";

/// Inserts a reservation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (id, code, check_in, check_out, adults, children, infants, guest_name,
     nightly_rate, cleaning_fee, pet_fee, tourist_tax, policy, total_price,
     applied_credit, amount_due, status, created_at, updated_at, cancelled_at,
     cancellation_reason, released_from)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
            ?16, ?17, ?18, ?19, ?20, ?21, ?22)
";

/// Replaces every mutable column of a reservation. `id`, `code` and
/// `created_at` never change.
pub const UPDATE_RESERVATION: &str = r"
    UPDATE reservations SET
        check_in = ?2, check_out = ?3, adults = ?4, children = ?5, infants = ?6,
        guest_name = ?7, nightly_rate = ?8, cleaning_fee = ?9, pet_fee = ?10,
        tourist_tax = ?11, policy = ?12, total_price = ?13, applied_credit = ?14,
        amount_due = ?15, status = ?16, updated_at = ?17, cancelled_at = ?18,
        cancellation_reason = ?19, released_from = ?20
    WHERE id = ?1
";
