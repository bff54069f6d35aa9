mod harness;
mod memory;
mod redis;
mod scenarios;
