use std::{cell::RefCell, ffi::OsStr, str::FromStr, time::Duration};

const DEFAULT_STEP_LIMIT: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Env {
    /// Cycles `run` executes before giving up on a program
    step_limit: usize,
    /// Pause between cycles in `run`
    step_delay_ms: u64,
}

thread_local! {
    /// Must only be mutated within `set_env`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

impl Env {
    fn from_vars() -> Self {
        Env {
            step_limit: var_parse("LMC_STEP_LIMIT").unwrap_or(DEFAULT_STEP_LIMIT),
            step_delay_ms: var_parse("LMC_STEP_DELAY_MS").unwrap_or(0),
        }
    }
}

/// Read configuration from the environment. Accessors call this implicitly if needed.
pub fn init() {
    set_env(Env::from_vars());
}

pub fn step_limit() -> usize {
    with_env(|env| env.step_limit)
}

pub fn step_delay() -> Duration {
    with_env(|env| Duration::from_millis(env.step_delay_ms))
}

fn set_env(value: Env) {
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

fn with_env<F, R>(callback: F) -> R
where
    F: Fn(&Env) -> R,
{
    ENV.with(|env| {
        let env = *env.borrow_mut().get_or_insert_with(Env::from_vars);
        callback(&env)
    })
}

/// Unset or malformed variables are treated alike.
fn var_parse<T: FromStr>(name: impl AsRef<OsStr>) -> Option<T> {
    std::env::var(name.as_ref()).ok()?.trim().parse().ok()
}
