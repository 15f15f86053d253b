pub(crate) mod csv_store;
