//! Ownership and permission specs applied to freshly created paths.

use std::fmt;

/// A read/write/execute mask for one principal class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access(u8);

impl Access {
    pub const NONE: Access = Access(0);
    pub const EXECUTE: Access = Access(0b001);
    pub const WRITE: Access = Access(0b010);
    pub const READ: Access = Access(0b100);
    pub const READ_EXECUTE: Access = Access(0b101);
    pub const ALL: Access = Access(0b111);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn can_read(self) -> bool {
        self.0 & Self::READ.0 != 0
    }

    pub fn can_write(self) -> bool {
        self.0 & Self::WRITE.0 != 0
    }

    pub fn can_execute(self) -> bool {
        self.0 & Self::EXECUTE.0 != 0
    }
}

/// Owner/group/other access plus the restricted (sticky) bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub owner: Access,
    pub group: Access,
    pub other: Access,
    pub sticky: bool,
}

impl Permission {
    /// `rwxr-xr-t`, used for the shared home root
    pub const SHARED_ROOT: Permission = Permission {
        owner: Access::ALL,
        group: Access::READ_EXECUTE,
        other: Access::READ_EXECUTE,
        sticky: true,
    };

    /// `r-------T`, used for user homes and secrets
    pub const OWNER_READ_ONLY: Permission = Permission {
        owner: Access::READ,
        group: Access::NONE,
        other: Access::NONE,
        sticky: true,
    };

    /// Numeric mode, e.g. `0o1755`
    pub fn mode(&self) -> u16 {
        let sticky = if self.sticky { 0o1000 } else { 0 };
        sticky
            | (u16::from(self.owner.bits()) << 6)
            | (u16::from(self.group.bits()) << 3)
            | u16::from(self.other.bits())
    }

    /// Octal rendering without prefix, the form WebHDFS expects (`1755`)
    pub fn octal(&self) -> String {
        format!("{:o}", self.mode())
    }

    /// `ls -l` style rendering, e.g. `rwxr-xr-t`
    pub fn symbolic(&self) -> String {
        let mut out = String::with_capacity(9);
        for (class, access) in [self.owner, self.group, self.other].iter().enumerate() {
            out.push(if access.can_read() { 'r' } else { '-' });
            out.push(if access.can_write() { 'w' } else { '-' });
            let exec = access.can_execute();
            out.push(match (class == 2 && self.sticky, exec) {
                (true, true) => 't',
                (true, false) => 'T',
                (false, true) => 'x',
                (false, false) => '-',
            });
        }
        out
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbolic())
    }
}

/// Owning user and group of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub user: String,
    pub group: String,
}

impl Ownership {
    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user, self.group)
    }
}
