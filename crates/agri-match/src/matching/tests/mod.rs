mod categories;
mod common;
mod ranking;
mod routing;
