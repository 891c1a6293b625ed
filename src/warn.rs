//! Diagnostics on stderr.

//! `warn!` is always enabled. `trace!` is only enabled if the
//! `BEMPLATE_TRACE` env var is set to a truthy value or
//! `trace_set(true)` was called in the thread. Both can be compiled
//! out completely by prefixing their names with `no`.

use std::cell::Cell;

use crate::env::get_env_bool;

fn trace_env_get() -> bool {
    match get_env_bool("BEMPLATE_TRACE") {
        Ok(v) => v,
        Err(e) => {
            eprintln!("W: ignoring BEMPLATE_TRACE: {e}");
            false
        }
    }
}

thread_local!{
    pub static TRACE: Cell<bool> = Cell::new(trace_env_get());
}

/// Enable or disable `trace!` for the current thread.
pub fn trace_set(on: bool) {
    TRACE.with(|cell| cell.set(on))
}

pub fn trace_enabled() -> bool {
    TRACE.with(|cell| cell.get())
}


#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        use std::io::Write;
        let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
        let _ = write!(&mut outp, "W: ");
        let _ = write!(&mut outp, $formatstr $(,$arg)*);
        let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
        let _ = outp.flush();
    } }
}

#[macro_export]
macro_rules! nowarn {
    ($formatstr:expr $(,$arg:expr)*) => {
    }
}

#[macro_export]
macro_rules! trace {
    ($formatstr:expr $(,$arg:expr)*) => { {
        if $crate::warn::trace_enabled() {
            use std::io::Write;
            let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
            let _ = write!(&mut outp, "T: ");
            let _ = write!(&mut outp, $formatstr $(,$arg)*);
            let _ = writeln!(&mut outp);
            let _ = outp.flush();
        }
    } }
}

#[macro_export]
macro_rules! notrace {
    ($formatstr:expr $(,$arg:expr)*) => {
    }
}
