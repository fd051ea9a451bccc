//! Esquema Diesel. Reemplazable con `diesel print-schema`.

diesel::table! {
    pchem_results (cache_key) {
        cache_key -> Text,
        structure -> Text,
        calculator -> Text,
        property -> Nullable<Text>,
        conditions_hash -> Text,
        payload -> Jsonb,
        created_at -> Timestamptz,
    }
}
