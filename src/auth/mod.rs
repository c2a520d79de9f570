pub(crate) mod extractors;
