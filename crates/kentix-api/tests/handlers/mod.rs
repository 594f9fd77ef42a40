mod basic;
mod configs;
