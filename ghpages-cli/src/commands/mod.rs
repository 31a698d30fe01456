pub mod describe;
pub mod publish;
