mod clock;
mod sweep;
