//! Test modules for the no-loss lottery contract.

mod mock_reserve;

mod randomness;
