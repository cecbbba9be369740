//! Типизированные представления сырых int-полей записи.
//!
//! Запись хранит «сырые» i32 (неизвестные значения сохраняются как есть),
//! а эти перечисления - только удобный вид для вызывающего кода и CLI.

/// Общий доступ к `name()` для обобщённого `label`.
pub trait NamedKind: Copy {
    fn kind_name(self) -> &'static str;
}

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident = $value:expr => $label:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            #[inline]
            pub fn as_i32(self) -> i32 {
                self as i32
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = i32;

            fn try_from(v: i32) -> Result<Self, i32> {
                match v {
                    $(x if x == $value => Ok($name::$variant),)+
                    other => Err(other),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(v: $name) -> i32 {
                v.as_i32()
            }
        }

        impl NamedKind for $name {
            fn kind_name(self) -> &'static str {
                self.name()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

int_enum! {
    /// Outcome of a dex2oat child process.
    /// Values mirror the ExecResultStatus enum of the OdrefreshReported atom.
    pub enum ExecStatus {
        Unknown = 0 => "unknown",
        Exited = 1 => "exited",
        Signaled = 2 => "signaled",
        TimedOut = 3 => "timed_out",
        StartFailed = 4 => "start_failed",
        NotRun = 5 => "not_run",
    }
}

int_enum! {
    /// Почему был запущен odrefresh.
    pub enum Trigger {
        Unknown = 0 => "unknown",
        ApexVersionMismatch = 1 => "apex_version_mismatch",
        DexFilesChanged = 2 => "dex_files_changed",
        MissingArtifacts = 3 => "missing_artifacts",
    }
}

int_enum! {
    /// Последняя достигнутая стадия.
    pub enum Stage {
        Unknown = 0 => "unknown",
        Check = 10 => "check",
        Preparation = 20 => "preparation",
        PrimaryBootClasspath = 30 => "primary_boot_classpath",
        SecondaryBootClasspath = 40 => "secondary_boot_classpath",
        SystemServerClasspath = 50 => "system_server_classpath",
        Complete = 60 => "complete",
    }
}

int_enum! {
    /// Итоговый статус прогона.
    pub enum Status {
        Unknown = 0 => "unknown",
        Ok = 1 => "ok",
        NoSpace = 2 => "no_space",
        IoError = 3 => "io_error",
        Dex2OatError = 4 => "dex2oat_error",
        TimeLimitExceeded = 5 => "time_limit_exceeded",
        StagingFailed = 6 => "staging_failed",
        InstallFailed = 7 => "install_failed",
    }
}

int_enum! {
    /// Какие boot-образы компилировались на стадии BCP.
    pub enum BcpCompilationType {
        Unknown = 0 => "unknown",
        PrimaryAndMainline = 1 => "primary_and_mainline",
        Mainline = 2 => "mainline",
    }
}

/// Вид для беззнакового поля; значения вне i32 считаются неизвестными.
pub fn compilation_type_label(raw: u32) -> &'static str {
    i32::try_from(raw).map(label::<BcpCompilationType>).unwrap_or("?")
}

/// Имя значения или "?" для неизвестного кода (для человекочитаемого вывода).
pub fn label<E>(raw: i32) -> &'static str
where
    E: TryFrom<i32, Error = i32> + NamedKind,
{
    E::try_from(raw).map(NamedKind::kind_name).unwrap_or("?")
}
