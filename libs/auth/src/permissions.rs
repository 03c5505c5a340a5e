//! Permission token catalog and composite checks
//!
//! Permission strings are issued by the server at login/validation time; the
//! constants here only name them. The composite helpers mirror the checks the
//! UI layer performs most often.

use crate::session::SessionStore;

pub mod client {
    pub const VIEW: &str = "client.view";
    pub const VIEW_ANY: &str = "client.view_any";
    pub const CREATE: &str = "client.create";
    pub const UPDATE: &str = "client.update";
    pub const DELETE: &str = "client.delete";
}

pub mod wallet {
    pub const VIEW: &str = "wallet.view";
    pub const VIEW_ANY: &str = "wallet.view_any";
    pub const CREATE: &str = "wallet.create";
    pub const UPDATE: &str = "wallet.update";
    pub const DELETE: &str = "wallet.delete";
}

pub mod ledger {
    pub const VIEW: &str = "ledger.view";
    pub const VIEW_ANY: &str = "ledger.view_any";
    pub const CREDIT: &str = "ledger.credit";
    pub const DEBIT: &str = "ledger.debit";
    pub const ADJUST: &str = "ledger.adjust";
}

pub mod tag {
    pub const VIEW: &str = "tag.view";
    pub const VIEW_ANY: &str = "tag.view_any";
    pub const CREATE: &str = "tag.create";
    pub const UPDATE: &str = "tag.update";
    pub const DELETE: &str = "tag.delete";
}

pub mod report {
    pub const VIEW: &str = "report.view";
    pub const VIEW_ANY: &str = "report.view_any";
}

impl SessionStore {
    /// Can create, update, or delete clients
    pub fn can_manage_clients(&self) -> bool {
        self.can_any(&[client::CREATE, client::UPDATE, client::DELETE])
    }

    /// Can create, update, or delete wallets
    pub fn can_manage_wallets(&self) -> bool {
        self.can_any(&[wallet::CREATE, wallet::UPDATE, wallet::DELETE])
    }

    /// Can add any kind of ledger entry
    pub fn can_add_entry(&self) -> bool {
        self.can_any(&[ledger::CREDIT, ledger::DEBIT, ledger::ADJUST])
    }

    pub fn can_add_credits(&self) -> bool {
        self.can(ledger::CREDIT)
    }

    pub fn can_add_debits(&self) -> bool {
        self.can(ledger::DEBIT)
    }

    pub fn can_add_adjustments(&self) -> bool {
        self.can(ledger::ADJUST)
    }

    /// Can create, update, or delete tags
    pub fn can_manage_tags(&self) -> bool {
        self.can_any(&[tag::CREATE, tag::UPDATE, tag::DELETE])
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role("super_admin")
    }

    pub fn is_admin(&self) -> bool {
        self.has_any_role(&["super_admin", "admin"])
    }

    pub fn is_manager(&self) -> bool {
        self.has_any_role(&["super_admin", "admin", "manager"])
    }
}
