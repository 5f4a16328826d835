// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod declarations_csv_datasource;
        pub(crate) mod declarations_datasource;
        pub(crate) mod declarations_json_file_datasource;
        pub(crate) mod declarations_memory_datasource;
        pub(crate) mod declarations_rest_datasource;
        pub(crate) mod portal_config_ron_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod declaration_row_model;
        pub(crate) mod import_row_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod declarations_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod declaration;
        pub(crate) mod declaration_filter;
        pub(crate) mod note_de_perception;
        pub(crate) mod portal_config;
        pub(crate) mod tax_calculation;
        pub(crate) mod vehicle_category;
        pub(crate) mod verification;
    }
    pub(crate) mod logic {
        pub(crate) mod business_calendar;
        pub(crate) mod declaration_generator;
        pub(crate) mod id_generator;
        pub(crate) mod number_to_words;
        pub(crate) mod sanitizer;
        pub(crate) mod tax_rules;
        pub(crate) mod utils;
    }
    pub(crate) mod repositories {
        pub(crate) mod declarations_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod declaration_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod bordereau_printer;
    pub(crate) mod receipt_printer;
    pub(crate) mod utils;
    pub(crate) mod vignette_printer;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::declaration::*;
        pub use crate::domain::entities::declaration_filter::*;
        pub use crate::domain::entities::note_de_perception::*;
        pub use crate::domain::entities::portal_config::*;
        pub use crate::domain::entities::tax_calculation::*;
        pub use crate::domain::entities::vehicle_category::*;
        pub use crate::domain::entities::verification::*;
        pub use crate::presentation::receipt_printer::ReceiptCopy;
    }

    pub mod rules {
        pub use crate::domain::logic::business_calendar::BusinessCalendar;
        pub use crate::domain::logic::declaration_generator::{
            generate_note, DeclarationGenerator,
        };
        pub use crate::domain::logic::id_generator::{
            declaration_sequence, generate_declaration_id, generate_note_id, DECL_BASE, NDP_BASE,
        };
        pub use crate::domain::logic::number_to_words::number_to_words;
        pub use crate::domain::logic::tax_rules::*;
    }

    pub mod datasources {
        pub use crate::data::datasources::declarations_datasource::DeclarationsDatasource;
        pub use crate::data::datasources::declarations_json_file_datasource::DeclarationsJsonFileDatasource;
        pub use crate::data::datasources::declarations_memory_datasource::DeclarationsMemoryDatasource;
        pub use crate::data::datasources::declarations_rest_datasource::DeclarationsRestDatasource;
        pub use crate::data::models::declaration_row_model::{DeclarationRowModel, ReceiptLogModel};
    }
}
