#![cfg(test)]

mod addressing;
mod resolution;
mod util;
