use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");
define_internal_error!(WriteError, "Error writing file.");

// Parsing-related.
define_client_error!(InvalidCsv, "Invalid CSV format.");
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_internal_error!(
    InvalidStoredRecord,
    "Stored record '{id}' could not be decoded: {details}.",
    { id: &str, details: &str }
);
define_internal_error!(
    SerializationFailed,
    "Failed to serialize {what}.",
    { what: &str }
);

// Declaration-related.
define_client_error!(
    DeclarationNotFound,
    "Declaration '{id}' not found.",
    { id: &str }
);
define_client_error!(
    MissingDeclarationField,
    "Missing required field '{field}' on declaration form.",
    { field: &str }
);
define_internal_error!(
    DeclarationIdExhausted,
    "Could not allocate a free declaration id after {attempts} attempts.",
    { attempts: u32 }
);

// Hosted database.
define_internal_error!(
    DatabaseRequestFailed,
    "Request to hosted table '{table}' failed.",
    { table: &str }
);
define_internal_error!(
    DatabaseRejectedRequest,
    "Hosted table '{table}' rejected the request with status {status}.",
    { table: &str, status: u16 }
);
