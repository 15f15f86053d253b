pub(crate) mod fetcher;
pub(crate) mod rate_limit;
