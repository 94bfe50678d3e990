pub mod actuator;
pub mod capture;
pub mod client;
pub mod clock;
pub mod line_buffer;
pub mod protocol;
pub mod std_transport;

#[cfg(test)]
pub(crate) mod testing;
