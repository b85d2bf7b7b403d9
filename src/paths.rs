/// Removable package candidates shipped on the installation media
pub const PACKAGES_LIST_FILE_PATH: &str = "/etc/anaconda/removable_pkgs.list";

/// Selection file, relative to the root of the installed system
pub const REMOVABLE_PACKAGES_FILE_PATH: &str = "etc/anaconda/pkgs_to_remove.list";

/// Default root of the system under installation
pub const DEFAULT_SYSROOT: &str = "/mnt/sysimage";

/// Default socket the service listens on
pub const DEFAULT_SOCKET_PATH: &str = "/run/anaconda/pkgremove.sock";

/// Service name of the add-on
pub const SERVICE_NAME: &str = "org.rosa.Anaconda.Addons.PackageRemove";

/// Object path of the add-on
pub const OBJECT_PATH: &str = "/org/rosa/Anaconda/Addons/PackageRemove";

/// Name of the add-on section in kickstart documents
pub const KICKSTART_SECTION: &str = "org_rosa_package_remove";
