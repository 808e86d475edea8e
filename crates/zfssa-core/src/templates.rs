// ── Input templates ──
//
// Sample CSV files, one per entity and mode, with a commented header
// describing every column.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use strum::{Display, EnumString};
use tracing::info;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TemplateKind {
    Projects,
    Filesystems,
    Luns,
    Snapshots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TemplateMode {
    Create,
    #[strum(to_string = "destroy", serialize = "delete")]
    Delete,
}

const PROJECT_CREATE: &str = "\
# Template create projects
# pool:                 str
# project:              str
# mountpoint:           str
# quota:                str or int  example: 10737418240 or 10g
# reservation:          str or int  example: 10737418240 or 10g
# compression:          str         example: gzip, lzjb, lz4
# logbias:              str         values: latency|throughput
# nodestroy:            bool
# recordsize:           str or int  example: 131072 or 128k
# readonly:             bool
# atime:                bool
# default_sparse:       bool
# default_user:         str
# default_group:        str
# default_permissions:  int         example: 750
# default_volblocksize: str or int  example: 131072 or 128k
# default_volsize:      str or int  example: 10737418240 or 10g
# sharenfs:             str
# sharesmb:             str
#
# Check the REST API documentation of your appliance release for accepted values.
#
# pool,project,mountpoint,quota,reservation,compression,logbias,nodestroy,recordsize,readonly,atime,default_sparse,default_user,default_group,default_permissions,default_volblocksize,default_volsize,sharenfs,sharesmb
pool_0,unittest01,/export/unittest01,10g,10g,gzip,latency,False,128k,False,True,True,nobody,other,750,128k,1g,on,off
";

const PROJECT_DESTROY: &str = "\
# Template destroy projects
# pool:    str
# project: str
#
# pool,project
pool_0,unittest01
";

const FILESYSTEM_CREATE: &str = "\
# Template create filesystems
# pool:             str
# project:          str
# filesystem:       str
# mountpoint:       str
# quota:            str or int   example: 10737418240 or 10g
# reservation:      str or int   example: 10737418240 or 10g
# compression:      str          example: gzip, lzjb, lz4
# logbias:          str          values: latency|throughput
# nodestroy:        bool
# recordsize:       str or int   example: 131072 or 128k
# readonly:         bool
# atime:            bool
# root_user:        str
# root_group:       str
# root_permissions: int          example: 750
# sharenfs:         str          example: on or rw=@192.168.56.101/24:@192.168.56.1/24
# sharesmb:         str
#
# Check the REST API documentation of your appliance release for accepted values.
#
# pool,project,filesystem,mountpoint,quota,reservation,compression,logbias,nodestroy,recordsize,readonly,atime,root_user,root_group,root_permissions,sharenfs,sharesmb
pool_0,unittest,fs10,/export/unittest/fs10,2g,1g,lzjb,latency,False,128k,False,False,root,other,750,rw=@192.168.56.101/24:@192.168.56.1/24,on
";

const FILESYSTEM_DESTROY: &str = "\
# Template destroy filesystems
# pool:       str
# project:    str
# filesystem: str
#
# pool,project,filesystem
pool_0,unittest,fs10
";

const LUN_CREATE: &str = "\
# Template create luns
# pool:         str
# project:      str
# lun:          str
# size:         str or int   example: 10737418240 or 10g
# blocksize:    str or int   example: 131072 or 128k (power of two)
# thin:         bool
# targetgrp:    str
# initiatorgrp: str
# compression:  str          example: gzip, lzjb, lz4
# logbias:      str          values: latency|throughput
# nodestroy:    bool
#
# Check the REST API documentation of your appliance release for accepted values.
#
# pool,project,lun,size,blocksize,thin,targetgrp,initiatorgrp,compression,logbias,nodestroy
pool_0,unittest,lun01,1g,128k,False,default,cluster-test,gzip,latency,False
";

const LUN_DESTROY: &str = "\
# Template destroy luns
# pool:    str
# project: str
# lun:     str
#
# pool,project,lun
pool_0,unittest,lun01
";

const SNAPSHOTS: &str = "\
# Template snapshots
# pool:       str
# project:    str
# snaptarget: str   filesystem or lun name, '-' for projects
# snaptype:   str   values: project|filesystem|lun
# snapname:   str
#
# pool,project,snaptarget,snaptype,snapname
#
# Project snapshot
pool_0,unittest,-,project,backup
#
# Filesystem snapshot
pool_0,unittest,fs01,filesystem,backup
#
# Lun snapshot
pool_0,unittest,lun10,lun,backup
";

impl TemplateKind {
    pub fn contents(self, mode: TemplateMode) -> &'static str {
        match (self, mode) {
            (Self::Projects, TemplateMode::Create) => PROJECT_CREATE,
            (Self::Projects, TemplateMode::Delete) => PROJECT_DESTROY,
            (Self::Filesystems, TemplateMode::Create) => FILESYSTEM_CREATE,
            (Self::Filesystems, TemplateMode::Delete) => FILESYSTEM_DESTROY,
            (Self::Luns, TemplateMode::Create) => LUN_CREATE,
            (Self::Luns, TemplateMode::Delete) => LUN_DESTROY,
            (Self::Snapshots, _) => SNAPSHOTS,
        }
    }

    /// `create_<kind>.csv` or `destroy_<kind>.csv`
    pub fn file_name(self, mode: TemplateMode) -> String {
        format!("{mode}_{self}.csv")
    }
}

/// Write the template for `kind` and `mode` into `dir`. An existing file
/// is never overwritten.
pub fn write_template(
    dir: &Path,
    kind: TemplateKind,
    mode: TemplateMode,
) -> Result<PathBuf, CoreError> {
    let path = dir.join(kind.file_name(mode));
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(CoreError::TemplateExists { path });
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(kind.contents(mode).as_bytes())?;
    info!(path = %path.display(), "template written");
    Ok(path)
}
