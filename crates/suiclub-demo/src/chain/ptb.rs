//! Programmable transaction plans.
//!
//! A `TxPlan` is the ordered list of commands one transaction runs. It only
//! knows the three commands the demo needs and renders itself as arguments
//! for `sui client ptb`, which does the actual BCS building and signing.

/// Command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// The transaction's gas coin.
    Gas,
    /// Object input by id.
    Object(String),
    /// Pure `address`.
    Address(String),
    /// Pure `u64`.
    U64(u64),
    /// Pure `vector<u8>`.
    Bytes(Vec<u8>),
    /// `index`-th result of an earlier command assigned to `name`.
    Result { name: String, index: usize },
}

impl Arg {
    fn render(&self) -> String {
        match self {
            Arg::Gas => "gas".into(),
            Arg::Object(id) | Arg::Address(id) => format!("@{id}"),
            Arg::U64(n) => n.to_string(),
            Arg::Bytes(b) => {
                let items: Vec<String> = b.iter().map(|x| format!("{x}u8")).collect();
                format!("vector[{}]", items.join(","))
            }
            Arg::Result { name, index } => format!("{name}.{index}"),
        }
    }
}

fn render_list(args: &[Arg]) -> String {
    let items: Vec<String> = args.iter().map(Arg::render).collect();
    format!("[{}]", items.join(","))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SplitCoins {
        coin: Arg,
        amounts: Vec<Arg>,
        assign: String,
    },
    MergeCoins {
        into: Arg,
        coins: Vec<Arg>,
    },
    MoveCall {
        /// `package::module::function`
        target: String,
        args: Vec<Arg>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxPlan {
    commands: Vec<Command>,
    splits: usize,
}

impl TxPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `amounts` off `coin`; returns one handle per new coin.
    pub fn split_coins(&mut self, coin: Arg, amounts: &[u64]) -> Vec<Arg> {
        let assign = format!("split{}", self.splits);
        self.splits += 1;
        self.commands.push(Command::SplitCoins {
            coin,
            amounts: amounts.iter().copied().map(Arg::U64).collect(),
            assign: assign.clone(),
        });
        (0..amounts.len())
            .map(|index| Arg::Result {
                name: assign.clone(),
                index,
            })
            .collect()
    }

    /// Split a single coin of `amount` off `coin`.
    pub fn split_coin(&mut self, coin: Arg, amount: u64) -> Arg {
        let assign = format!("split{}", self.splits);
        self.split_coins(coin, &[amount]);
        Arg::Result {
            name: assign,
            index: 0,
        }
    }

    pub fn merge_coins(&mut self, into: Arg, coins: Vec<Arg>) {
        self.commands.push(Command::MergeCoins { into, coins });
    }

    pub fn move_call(&mut self, target: impl Into<String>, args: Vec<Arg>) {
        self.commands.push(Command::MoveCall {
            target: target.into(),
            args,
        });
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Move call targets in order, for logs.
    pub fn targets(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::MoveCall { target, .. } => Some(target.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Arguments for `sui client ptb` (without budget/output flags).
    pub fn to_ptb_args(&self) -> Vec<String> {
        let mut out = Vec::new();
        for cmd in &self.commands {
            match cmd {
                Command::SplitCoins {
                    coin,
                    amounts,
                    assign,
                } => {
                    out.push("--split-coins".into());
                    out.push(coin.render());
                    out.push(render_list(amounts));
                    out.push("--assign".into());
                    out.push(assign.clone());
                }
                Command::MergeCoins { into, coins } => {
                    out.push("--merge-coins".into());
                    out.push(into.render());
                    out.push(render_list(coins));
                }
                Command::MoveCall { target, args } => {
                    out.push("--move-call".into());
                    out.push(target.clone());
                    out.extend(args.iter().map(Arg::render));
                }
            }
        }
        out
    }
}
