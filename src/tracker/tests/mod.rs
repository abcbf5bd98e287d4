mod common;
mod storage;
