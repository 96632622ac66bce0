//! Line oriented driver that runs queue commands against a [`QueueChain`].
//!
//! Every line holds one command, `#` starts a comment. After a command
//! changes the current queue the queue is checked and printed as
//! `l = [a b c]`. Failing commands print an `ERROR:` line and are counted,
//! the console keeps going.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

use crate::chain::QueueChain;
use crate::config::Config;
use crate::queue::LinkedQueue;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Free,
    InsertHead { value: String, count: usize },
    InsertTail { value: String, count: usize },
    RemoveHead { expected: Option<String> },
    RemoveTail { expected: Option<String> },
    Size,
    DeleteMiddle,
    Dedup,
    Swap,
    Reverse,
    ReverseK(usize),
    Sort,
    Ascend,
    Descend,
    Merge,
    Next,
    Show,
    SetOption { name: String, value: usize },
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| Error::Parse("empty command".to_string()))?;
        let args: Vec<&str> = parts.collect();

        let arity = |min: usize, max: usize| {
            if args.len() < min || args.len() > max {
                Err(Error::Parse(format!(
                    "wrong number of arguments for `{}`",
                    name
                )))
            } else {
                Ok(())
            }
        };

        let cmd = match name {
            "new" => arity(0, 0).map(|_| Command::New)?,
            "free" => arity(0, 0).map(|_| Command::Free)?,
            "ih" | "it" => {
                arity(1, 2)?;
                let value = args[0].to_string();
                let count = match args.get(1) {
                    Some(n) => parse_number(name, n)?,
                    None => 1,
                };

                if name == "ih" {
                    Command::InsertHead { value, count }
                } else {
                    Command::InsertTail { value, count }
                }
            }
            "rh" | "rt" => {
                arity(0, 1)?;
                let expected = args.first().map(|s| s.to_string());

                if name == "rh" {
                    Command::RemoveHead { expected }
                } else {
                    Command::RemoveTail { expected }
                }
            }
            "size" => arity(0, 0).map(|_| Command::Size)?,
            "dm" => arity(0, 0).map(|_| Command::DeleteMiddle)?,
            "dedup" => arity(0, 0).map(|_| Command::Dedup)?,
            "swap" => arity(0, 0).map(|_| Command::Swap)?,
            "reverse" => arity(0, 0).map(|_| Command::Reverse)?,
            "reverseK" => {
                arity(1, 1)?;
                Command::ReverseK(parse_number(name, args[0])?)
            }
            "sort" => arity(0, 0).map(|_| Command::Sort)?,
            "ascend" => arity(0, 0).map(|_| Command::Ascend)?,
            "descend" => arity(0, 0).map(|_| Command::Descend)?,
            "merge" => arity(0, 0).map(|_| Command::Merge)?,
            "next" => arity(0, 0).map(|_| Command::Next)?,
            "show" => arity(0, 0).map(|_| Command::Show)?,
            "option" => {
                arity(2, 2)?;
                Command::SetOption {
                    name: args[0].to_string(),
                    value: parse_number(name, args[1])?,
                }
            }
            "quit" => arity(0, 0).map(|_| Command::Quit)?,
            other => return Err(Error::Parse(format!("unknown command `{}`", other))),
        };

        Ok(cmd)
    }
}

fn parse_number(cmd: &str, arg: &str) -> Result<usize> {
    arg.parse()
        .map_err(|_| Error::Parse(format!("`{}` expects a number, got `{}`", cmd, arg)))
}

/// Whether the console should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub commands: usize,
    pub errors: usize,
}

pub struct Console<W> {
    chain: QueueChain,
    current: Option<usize>,
    descend: bool,
    buf_size: usize,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(config: Config, out: W) -> Result<Self> {
        let buf_size = config.buf_size;

        Ok(Self {
            chain: QueueChain::new(config)?,
            current: None,
            descend: false,
            buf_size,
            out,
        })
    }

    pub fn chain(&self) -> &QueueChain {
        &self.chain
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<Summary> {
        let file = File::open(path)?;
        self.run(BufReader::new(file))
    }

    /// Execute commands from `input` until it ends or a `quit`.
    ///
    /// Only failing to read input or to write output aborts the run, every
    /// other error is reported and counted in the [`Summary`].
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<Summary> {
        let mut summary = Summary::default();

        for line in input.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            writeln!(self.out, "cmd> {}", line)?;
            summary.commands += 1;

            match line.parse::<Command>().and_then(|cmd| self.execute(cmd)) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    summary.errors += 1;
                    tracing::debug!(error = %e, line, "command failed");
                    writeln!(self.out, "ERROR: {}", e)?;
                }
            }
        }

        Ok(summary)
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Flow> {
        tracing::trace!(?cmd, "execute");

        match cmd {
            Command::New => {
                let id = self.chain.new_queue()?;
                self.current = Some(id);
            }
            Command::Free => {
                let id = self.current.ok_or(Error::NoQueue)?;
                let next = self.chain.next_id_after(id).filter(|next| *next != id);

                self.chain.remove(id);
                self.current = next;
            }
            Command::InsertHead { value, count } => {
                let queue = self.queue_mut()?;
                for _ in 0..count {
                    queue.insert_head(&value)?;
                }
            }
            Command::InsertTail { value, count } => {
                let queue = self.queue_mut()?;
                for _ in 0..count {
                    queue.insert_tail(&value)?;
                }
            }
            Command::RemoveHead { expected } => self.remove(true, expected)?,
            Command::RemoveTail { expected } => self.remove(false, expected)?,
            Command::Size => {
                let size = self.queue_mut()?.size();
                writeln!(self.out, "Queue size = {}", size)?;
            }
            Command::DeleteMiddle => {
                if !self.queue_mut()?.delete_middle() {
                    return Err(Error::Empty);
                }
            }
            Command::Dedup => {
                self.queue_mut()?.delete_duplicates()?;
            }
            Command::Swap => self.queue_mut()?.swap_pairs(),
            Command::Reverse => self.queue_mut()?.reverse(),
            Command::ReverseK(k) => self.queue_mut()?.reverse_k_group(k),
            Command::Sort => {
                let descend = self.descend;
                self.queue_mut()?.sort(descend);
            }
            Command::Ascend => {
                let size = self.queue_mut()?.ascend();
                writeln!(self.out, "Queue size = {}", size)?;
            }
            Command::Descend => {
                let size = self.queue_mut()?.descend();
                writeln!(self.out, "Queue size = {}", size)?;
            }
            Command::Merge => {
                let size = self.chain.merge_k(self.descend)?;
                self.current = self.chain.iter().next().map(|ctx| ctx.id());
                writeln!(self.out, "Merged size = {}", size)?;
            }
            Command::Next => {
                let id = self.current.ok_or(Error::NoQueue)?;
                self.current = self.chain.next_id_after(id);
            }
            Command::Show => {
                self.show_all()?;
                return Ok(Flow::Continue);
            }
            Command::SetOption { name, value } => {
                match name.as_str() {
                    "descend" => self.descend = value != 0,
                    _ => return Err(Error::Parse(format!("unknown option `{}`", name))),
                }
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        self.show_current()?;

        Ok(Flow::Continue)
    }

    fn remove(&mut self, head: bool, expected: Option<String>) -> Result<()> {
        let mut buf = vec![0u8; self.buf_size];

        let queue = self.queue_mut()?;
        let element = if head {
            queue.remove_head(Some(&mut buf[..]))
        } else {
            queue.remove_tail(Some(&mut buf[..]))
        };

        if element.is_none() {
            return Err(Error::Empty);
        }

        let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
        let removed = &buf[..end];

        writeln!(
            self.out,
            "Removed {} from queue",
            String::from_utf8_lossy(removed)
        )?;

        // Compare bytes, the expected value truncated like the removed one.
        match expected {
            Some(expected) if !truncated_eq(expected.as_bytes(), removed, buf.len()) => {
                Err(Error::Mismatch {
                    expected,
                    actual: String::from_utf8_lossy(removed).into_owned(),
                })
            }
            _ => Ok(()),
        }
    }

    fn queue_mut(&mut self) -> Result<&mut LinkedQueue> {
        let id = self.current.ok_or(Error::NoQueue)?;
        self.chain.get_mut(id).ok_or(Error::NoQueue)
    }

    fn show_current(&mut self) -> Result<()> {
        let queue = match self.current.and_then(|id| self.chain.get(id)) {
            Some(queue) => queue,
            None => {
                writeln!(self.out, "l = NULL")?;
                return Ok(());
            }
        };

        queue.check()?;
        writeln!(self.out, "l = {}", render(queue))?;

        Ok(())
    }

    fn show_all(&mut self) -> Result<()> {
        for ctx in self.chain.iter() {
            let marker = if Some(ctx.id()) == self.current { "*" } else { " " };
            writeln!(
                self.out,
                "{}q{} = {}",
                marker,
                ctx.id(),
                render(ctx.queue())
            )?;
        }

        Ok(())
    }
}

fn truncated_eq(expected: &[u8], removed: &[u8], buf_size: usize) -> bool {
    let n = expected.len().min(buf_size.saturating_sub(1));
    expected[..n] == removed[..]
}

fn render(queue: &LinkedQueue) -> String {
    format!("[{}]", queue.iter().collect::<Vec<_>>().join(" "))
}
