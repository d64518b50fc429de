use crate::process::ProcessError;

/// Delivers SIGINT to the child with the given pid.
#[cfg(unix)]
pub fn interrupt(pid: u32) -> Result<(), ProcessError> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|_| ProcessError::Signal(format!("pid {} out of range", pid)))?;
    let rc = unsafe { libc::kill(pid, libc::SIGINT) };
    if rc != 0 {
        return Err(ProcessError::Signal(
            std::io::Error::last_os_error().to_string(),
        ));
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn interrupt(_pid: u32) -> Result<(), ProcessError> {
    Err(ProcessError::Signal(
        "interrupting a child is not supported on this platform".to_string(),
    ))
}
