use crate::error::DbResult;
use crate::ident::check_ident;
use crate::manager::DatabaseManager;
use crate::param::ParamList;

/// `DROP TABLE [IF EXISTS ]t[ CASCADE]`
#[must_use = "builders do nothing until executed"]
pub struct DropTable<'a> {
    manager: &'a DatabaseManager,
    name: String,
    if_exists: bool,
    cascade: bool,
}

impl<'a> DropTable<'a> {
    pub(crate) fn new(manager: &'a DatabaseManager, name: impl Into<String>) -> Self {
        Self {
            manager,
            name: name.into(),
            if_exists: false,
            cascade: false,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    pub fn to_sql(&self) -> DbResult<String> {
        check_ident("table", &self.name)?;
        let exists = if self.if_exists { "IF EXISTS " } else { "" };
        let cascade = if self.cascade { " CASCADE" } else { "" };
        Ok(format!("DROP TABLE {exists}{}{cascade}", self.name))
    }

    pub async fn execute(self) -> DbResult<()> {
        let sql = self.to_sql()?;
        self.manager
            .execute(&self.name, &sql, &ParamList::new())
            .await?;
        Ok(())
    }
}

/// `TRUNCATE TABLE t[ RESTART IDENTITY][ CASCADE]`
#[must_use = "builders do nothing until executed"]
pub struct TruncateTable<'a> {
    manager: &'a DatabaseManager,
    name: String,
    restart_identity: bool,
    cascade: bool,
}

impl<'a> TruncateTable<'a> {
    pub(crate) fn new(manager: &'a DatabaseManager, name: impl Into<String>) -> Self {
        Self {
            manager,
            name: name.into(),
            restart_identity: false,
            cascade: false,
        }
    }

    pub fn restart_identity(mut self) -> Self {
        self.restart_identity = true;
        self
    }

    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    pub fn to_sql(&self) -> DbResult<String> {
        check_ident("table", &self.name)?;
        let restart = if self.restart_identity {
            " RESTART IDENTITY"
        } else {
            ""
        };
        let cascade = if self.cascade { " CASCADE" } else { "" };
        Ok(format!("TRUNCATE TABLE {}{restart}{cascade}", self.name))
    }

    pub async fn execute(self) -> DbResult<()> {
        let sql = self.to_sql()?;
        self.manager
            .execute(&self.name, &sql, &ParamList::new())
            .await?;
        Ok(())
    }
}
