use super::CollectError;
use std::ffi::OsStr;
use std::process::Command;
use tracing::debug;

pub fn run_tool<I, S>(program: &str, args: I) -> Result<String, CollectError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| CollectError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(CollectError::Exit {
            program: program.to_string(),
            status: output.status,
            stderr: decode_cmd_stdout(&output.stderr).trim().to_string(),
        });
    }

    debug!(program, stdout_bytes = output.stdout.len(), "tool finished");
    Ok(decode_cmd_stdout(&output.stdout))
}

// system_profiler, mdfind and mdls all write UTF-8
pub fn decode_cmd_stdout(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
