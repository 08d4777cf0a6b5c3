pub(crate) mod items;
pub(crate) mod products;
pub(crate) mod servers;
