//! An in-memory engine that answers commands the way libipset does, with the
//! same statuses, severities and diagnostic texts.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::net::IpAddr;

use crate::engine::{Engine, Submission};
use crate::error::{CommandError, Error, ErrorLevel};

struct MockSet {
    typename: String,
    family: Option<String>,
    timeout: Option<u32>,
    members: BTreeSet<IpAddr>,
}

#[derive(Default)]
pub(crate) struct MockEngine {
    sets: HashMap<String, MockSet>,
    replies: VecDeque<Submission>,
    pub(crate) commands: Vec<String>,
}

fn failure(level: ErrorLevel, message: impl AsRef<str>) -> Submission {
    Submission {
        status: -1,
        error: Some(CommandError::new(level, message)),
        output: String::new(),
    }
}

fn success(output: String) -> Submission {
    Submission {
        status: 0,
        error: None,
        output,
    }
}

fn no_such_set() -> Submission {
    failure(
        ErrorLevel::Error,
        "The set with the given name does not exist",
    )
}

impl MockEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer the next command with `submission` instead of simulating it.
    pub(crate) fn push_reply(&mut self, submission: Submission) {
        self.replies.push_back(submission);
    }

    pub(crate) fn last_command(&self) -> Option<&str> {
        self.commands.last().map(String::as_str)
    }

    fn create(&mut self, args: &[&str]) -> Submission {
        let (name, typename) = match args {
            [name, typename, ..] => (*name, *typename),
            _ => return failure(ErrorLevel::Error, "Syntax error: missing mandatory argument"),
        };
        if self.sets.contains_key(name) {
            return failure(
                ErrorLevel::Error,
                "Set cannot be created: set with the same name already exists",
            );
        }
        let takes_family = match typename.split_once(':') {
            Some(("hash", data_types)) => data_types.split(',').any(|t| t == "ip" || t == "net"),
            _ => false,
        };
        let mut set = MockSet {
            typename: typename.to_string(),
            family: takes_family.then(|| "inet".to_string()),
            timeout: None,
            members: BTreeSet::new(),
        };
        for pair in args[2..].chunks(2) {
            match pair {
                ["family", family] if takes_family => set.family = Some(family.to_string()),
                ["timeout", timeout] => match timeout.parse() {
                    Ok(timeout) => set.timeout = Some(timeout),
                    Err(_) => {
                        return failure(
                            ErrorLevel::Error,
                            format!("Syntax error: '{}' is invalid as number", timeout),
                        )
                    }
                },
                _ => {
                    return failure(
                        ErrorLevel::Error,
                        format!("Syntax error: Unknown argument {}", pair[0]),
                    )
                }
            }
        }
        self.sets.insert(name.to_string(), set);
        success(String::new())
    }

    fn save(&self, name: &str) -> Submission {
        let set = match self.sets.get(name) {
            Some(set) => set,
            None => return no_such_set(),
        };
        let mut output = format!("create {} {}", name, set.typename);
        if let Some(family) = &set.family {
            output.push_str(&format!(" family {} hashsize 1024 maxelem 65536", family));
        } else {
            output.push_str(" size 8");
        }
        if let Some(timeout) = set.timeout {
            output.push_str(&format!(" timeout {}", timeout));
        }
        if set.family.is_some() {
            output.push_str(" bucketsize 12 initval 0xd263dc02");
        }
        output.push('\n');
        for member in &set.members {
            output.push_str(&format!("add {} {}\n", name, member));
        }
        success(output)
    }

    /// Resolve `addr` against the family of `set`, like the libipset parser.
    fn element(set: &MockSet, addr: &str) -> Result<IpAddr, Submission> {
        let parsed: Option<IpAddr> = addr.parse().ok();
        match (set.family.as_deref().unwrap_or("inet"), parsed) {
            ("inet", Some(ip @ IpAddr::V4(_))) | ("inet6", Some(ip @ IpAddr::V6(_))) => Ok(ip),
            (family, _) => {
                let wanted = if family == "inet6" { "IPv6" } else { "IPv4" };
                Err(failure(
                    ErrorLevel::Error,
                    format!(
                        "Syntax error: cannot parse {}: resolving to {} address failed",
                        addr, wanted
                    ),
                ))
            }
        }
    }

    fn element_cmd(&mut self, cmd: &str, name: &str, addr: &str) -> Submission {
        let set = match self.sets.get_mut(name) {
            Some(set) => set,
            None => return no_such_set(),
        };
        let ip = match Self::element(set, addr) {
            Ok(ip) => ip,
            Err(submission) => return submission,
        };
        match cmd {
            "add" if !set.members.insert(ip) => failure(
                ErrorLevel::Error,
                "Element cannot be added to the set: it's already added",
            ),
            "del" if !set.members.remove(&ip) => failure(
                ErrorLevel::Error,
                "Element cannot be deleted from the set: it's not added",
            ),
            "test" if set.members.contains(&ip) => Submission {
                status: 0,
                error: Some(CommandError::new(
                    ErrorLevel::Notice,
                    format!("{} is in set {}.", addr, name),
                )),
                output: String::new(),
            },
            "test" => failure(
                ErrorLevel::Warning,
                format!("{} is NOT in set {}.", addr, name),
            ),
            _ => success(String::new()),
        }
    }

    fn run(&mut self, command: &str) -> Submission {
        let tokens: Vec<&str> = command.split_whitespace().collect();
        match tokens.as_slice() {
            ["create", args @ ..] => self.create(args),
            ["destroy", name] => match self.sets.remove(*name) {
                Some(_) => success(String::new()),
                None => no_such_set(),
            },
            ["flush", name] => match self.sets.get_mut(*name) {
                Some(set) => {
                    set.members.clear();
                    success(String::new())
                }
                None => no_such_set(),
            },
            ["save", name] => self.save(name),
            [cmd @ ("add" | "del" | "test"), name, addr] => self.element_cmd(cmd, name, addr),
            _ => failure(
                ErrorLevel::Error,
                format!("Syntax error: cannot parse command: {}", command),
            ),
        }
    }
}

impl Engine for MockEngine {
    fn submit(&mut self, command: &str) -> Result<Submission, Error> {
        self.commands.push(command.to_string());
        match self.replies.pop_front() {
            Some(submission) => Ok(submission),
            None => Ok(self.run(command)),
        }
    }
}
